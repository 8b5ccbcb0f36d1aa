//! Stream-copy edits: segment extraction, trimming against the source and
//! audio cut-and-loop. None of these build a filter graph.

use std::path::{Path, PathBuf};

use tracing::warn;

use crate::{
    config::RenderConfig,
    error::{EditError, Result},
    graph::num,
    render::RenderCommand,
    timeline::TimeWindow,
};

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// `-y -i IN -ss S -t D -c copy OUT`
fn cut(config: &RenderConfig, input: &Path, window: &TimeWindow, output: &Path) -> RenderCommand {
    RenderCommand::new(config.ffmpeg.as_str())
        .args(["-y", "-i"])
        .arg(path_arg(input))
        .arg("-ss")
        .arg(num(window.start))
        .arg("-t")
        .arg(num(window.duration()))
        .args(["-c", "copy"])
        .arg(path_arg(output))
}

/// One extracted segment and the command that writes it
#[derive(Debug, Clone, PartialEq)]
pub struct SplitSegment {
    /// 1-based position in the request
    pub number: usize,
    pub window: TimeWindow,
    pub output: PathBuf,
    pub command: RenderCommand,
}

/// Extract each `(start, end)` segment into `segment_N.mp4` under `output_dir`
///
/// Segments with `end <= start` are skipped with a warning; the rest keep
/// their request numbering.
pub fn split_segments(
    config: &RenderConfig,
    input: &Path,
    output_dir: &Path,
    segments: &[(f64, f64)],
) -> Result<Vec<SplitSegment>> {
    if segments.is_empty() {
        return Err(EditError::NoSegments.into());
    }

    let mut planned = Vec::with_capacity(segments.len());
    for (i, &(start, end)) in segments.iter().enumerate() {
        let number = i + 1;
        if !start.is_finite() || !end.is_finite() || start < 0.0 {
            return Err(EditError::InvalidSegment { number, start, end }.into());
        }
        if end <= start {
            warn!("Segment {}: end {} is not after start {}, skipping", number, end, start);
            continue;
        }

        let window = TimeWindow::new(start, end);
        let output = output_dir.join(format!("segment_{}.mp4", number));
        let command = cut(config, input, &window, &output);
        planned.push(SplitSegment { number, window, output, command });
    }

    Ok(planned)
}

/// Re-extract a segment from its source with the boundaries nudged
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdjustPlan {
    pub orig_start: f64,
    pub orig_end: f64,
    pub start_offset: f64,
    pub end_offset: f64,
}

impl AdjustPlan {
    pub fn new(orig_start: f64, orig_end: f64) -> Self {
        Self {
            orig_start,
            orig_end,
            start_offset: 0.0,
            end_offset: 0.0,
        }
    }

    pub fn with_offsets(mut self, start_offset: f64, end_offset: f64) -> Self {
        self.start_offset = start_offset;
        self.end_offset = end_offset;
        self
    }

    /// Offset window, clamped to `[0, source_duration]`
    pub fn window(&self, source_duration: f64) -> Result<TimeWindow> {
        let start = (self.orig_start + self.start_offset).max(0.0);
        let end = (self.orig_end + self.end_offset).min(source_duration);

        if !start.is_finite() || !end.is_finite() || end <= start {
            return Err(EditError::EmptyWindow { start, end }.into());
        }
        Ok(TimeWindow::new(start, end))
    }

    pub fn command(
        &self,
        config: &RenderConfig,
        source: &Path,
        source_duration: f64,
        output: &Path,
    ) -> Result<RenderCommand> {
        let window = self.window(source_duration)?;
        Ok(cut(config, source, &window, output))
    }
}

/// Cut the head of an audio file, then append a looped section of it
///
/// The output is the first `cut_duration` seconds followed by
/// `[loop_start, loop_end)` repeated until it lasts `loop_total` seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AudioLoopPlan {
    pub cut_duration: f64,
    pub loop_start: f64,
    pub loop_end: f64,
    pub loop_total: f64,
}

/// Commands and concat list for one audio loop job
///
/// `concat_list` must be written to `concat_list_path` before the last command runs.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioLoopJob {
    pub commands: Vec<RenderCommand>,
    pub concat_list_path: PathBuf,
    pub concat_list: String,
}

impl AudioLoopPlan {
    /// Build a plan from optional CLI values
    ///
    /// `None` when every value is missing, meaning the file is copied as-is.
    pub fn from_parts(
        cut_duration: Option<f64>,
        loop_start: Option<f64>,
        loop_end: Option<f64>,
        loop_total: Option<f64>,
    ) -> Result<Option<Self>> {
        match (cut_duration, loop_start, loop_end, loop_total) {
            (None, None, None, None) => Ok(None),
            (Some(cut_duration), Some(loop_start), Some(loop_end), Some(loop_total)) => Ok(Some(Self {
                cut_duration,
                loop_start,
                loop_end,
                loop_total,
            })),
            _ => Err(EditError::IncompleteLoop.into()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        let values = [self.cut_duration, self.loop_start, self.loop_end, self.loop_total];
        if values.iter().any(|v| !v.is_finite())
            || self.cut_duration <= 0.0
            || self.loop_start < 0.0
            || self.loop_end <= self.loop_start
            || self.loop_total <= 0.0
        {
            return Err(EditError::InvalidLoop {
                start: self.loop_start,
                end: self.loop_end,
                total: self.loop_total,
            }
            .into());
        }
        Ok(())
    }

    pub fn loop_duration(&self) -> f64 {
        self.loop_end - self.loop_start
    }

    /// Extra passes `-stream_loop` needs to fill `loop_total`
    pub fn extra_loops(&self) -> u64 {
        let passes = (self.loop_total / self.loop_duration()).ceil();
        passes.max(1.0) as u64 - 1
    }

    /// Commands writing intermediates into `work_dir`, then `output`
    ///
    /// `work_dir` must be absolute, since the concat demuxer resolves list
    /// entries against the list file.
    pub fn job(
        &self,
        config: &RenderConfig,
        input: &Path,
        output: &Path,
        work_dir: &Path,
    ) -> Result<AudioLoopJob> {
        self.validate()?;

        let extension = input.extension().and_then(|e| e.to_str()).unwrap_or("mp3");
        let part = work_dir.join(format!("part.{}", extension));
        let section = work_dir.join(format!("loop.{}", extension));
        let looped = work_dir.join(format!("loop_full.{}", extension));
        let concat_list_path = work_dir.join("concat_list.txt");

        let head = RenderCommand::new(config.ffmpeg.as_str())
            .args(["-y", "-i"])
            .arg(path_arg(input))
            .arg("-t")
            .arg(num(self.cut_duration))
            .args(["-c", "copy"])
            .arg(path_arg(&part));

        let section_window = TimeWindow::new(self.loop_start, self.loop_end);
        let section_cut = cut(config, input, &section_window, &section);

        let repeat = RenderCommand::new(config.ffmpeg.as_str())
            .args(["-y", "-stream_loop"])
            .arg(self.extra_loops().to_string())
            .arg("-i")
            .arg(path_arg(&section))
            .arg("-t")
            .arg(num(self.loop_total))
            .args(["-c", "copy"])
            .arg(path_arg(&looped));

        let join = RenderCommand::new(config.ffmpeg.as_str())
            .args(["-y", "-f", "concat", "-safe", "0", "-i"])
            .arg(path_arg(&concat_list_path))
            .args(["-c", "copy"])
            .arg(path_arg(output));

        let concat_list = format!("{}{}", concat_entry(&part), concat_entry(&looped));

        Ok(AudioLoopJob {
            commands: vec![head, section_cut, repeat, join],
            concat_list_path,
            concat_list,
        })
    }
}

/// `file '<path>'` line for the concat demuxer
fn concat_entry(path: &Path) -> String {
    format!("file '{}'\n", path.to_string_lossy().replace('\'', r"'\''"))
}
