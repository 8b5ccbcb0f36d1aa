use std::{
    fmt,
    path::{Path, PathBuf},
};

use tracing::warn;

use crate::{
    audio::MixGraph,
    config::RenderConfig,
    error::{RenderError, Result},
    graph::{CompiledGraph, OUTPUT_LABEL},
};

/// A renderer invocation: program plus argv
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderCommand {
    pub program: String,
    pub args: Vec<String>,
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

fn output_map() -> String {
    format!("[{}]", OUTPUT_LABEL)
}

impl RenderCommand {
    pub fn new<S: Into<String>>(program: S) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg<S: Into<String>>(mut self, arg: S) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Apply a compiled effects graph, re-encoding video
    ///
    /// `overlays` follow the main input, so the first one is read as `1:v`.
    pub fn effects(
        config: &RenderConfig,
        input: &Path,
        overlays: &[PathBuf],
        output: &Path,
        graph: &str,
    ) -> Self {
        let mut command = Self::new(config.ffmpeg.as_str())
            .args(["-y", "-i"])
            .arg(path_arg(input));

        for overlay in overlays {
            command = command.arg("-i").arg(path_arg(overlay));
        }

        command = command
            .arg("-filter_complex")
            .arg(graph)
            .args(["-map".to_string(), output_map()])
            .args(["-c:v", config.video_codec.as_str()]);

        if config.keep_audio {
            command = command.args(["-map", "0:a?", "-c:a", "copy"]);
        }

        command.arg(path_arg(output))
    }

    /// Stream-copy the input unchanged
    pub fn copy(config: &RenderConfig, input: &Path, output: &Path) -> Self {
        Self::new(config.ffmpeg.as_str())
            .args(["-y", "-i"])
            .arg(path_arg(input))
            .args(["-c", "copy"])
            .arg(path_arg(output))
    }

    /// Mix extra audio tracks in, copying the video stream
    pub fn mix(config: &RenderConfig, input: &Path, output: &Path, mix: &MixGraph) -> Self {
        let mut command = Self::new(config.ffmpeg.as_str())
            .args(["-y", "-i"])
            .arg(path_arg(input));

        for track in &mix.inputs {
            command = command.arg("-i").arg(path_arg(track));
        }

        command
            .arg("-filter_complex")
            .arg(mix.text.as_str())
            .args(["-map", "0:v", "-map", "[outa]", "-c:v", "copy", "-c:a", "aac"])
            .arg(path_arg(output))
    }

    /// Apply a sync graph, re-encoding video without audio
    pub fn sync(config: &RenderConfig, input: &Path, output: &Path, graph: &str) -> Self {
        Self::new(config.ffmpeg.as_str())
            .args(["-y", "-i"])
            .arg(path_arg(input))
            .arg("-filter_complex")
            .arg(graph)
            .args(["-map".to_string(), output_map()])
            .args(["-c:v", config.video_codec.as_str()])
            .arg(path_arg(output))
    }
}

/// Fail when `graph` reads the overlay stream but no overlay input was given
pub fn check_overlay_inputs(
    graph: &CompiledGraph,
    overlay_stream: &str,
    overlays: &[PathBuf],
) -> Result<()> {
    let reads_overlay = graph.reads_stream(overlay_stream);
    if reads_overlay && overlays.is_empty() {
        return Err(RenderError::MissingInput {
            stream: overlay_stream.to_string(),
        }
        .into());
    }

    if !reads_overlay && !overlays.is_empty() {
        warn!("No effect reads [{}], ignoring {} overlay input(s)", overlay_stream, overlays.len());
    }

    Ok(())
}

/// Shell-style rendering for logs and `--dry-run`
impl fmt::Display for RenderCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            let plain = !arg.is_empty()
                && arg
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || "-_./:=,+@%".contains(c));
            if plain {
                write!(f, " {}", arg)?;
            } else {
                write!(f, " '{}'", arg.replace('\'', r"'\''"))?;
            }
        }
        Ok(())
    }
}
