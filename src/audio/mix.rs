use std::path::{Path, PathBuf};

use tracing::debug;

use crate::{error::MixError, graph::STATEMENT_SEPARATOR};

/// Label of the mixed audio output
pub const MIX_OUTPUT_LABEL: &str = "outa";

/// An external track entering the mix at `start` seconds
#[derive(Debug, Clone, PartialEq)]
pub struct MixTrack {
    pub start: f64,
    pub path: PathBuf,
}

impl MixTrack {
    /// Delay in whole milliseconds, rounded down
    pub fn delay_ms(&self) -> u64 {
        (self.start * 1000.0).floor() as u64
    }
}

/// Audio filter graph plus the extra inputs it reads, in input order
#[derive(Debug, Clone, PartialEq)]
pub struct MixGraph {
    pub inputs: Vec<PathBuf>,
    pub text: String,
}

/// Builds an `adelay` + `amix` graph over the primary input and extra tracks
///
/// ```rust
/// use fxgraph::audio::MixGraphBuilder;
///
/// let mix = MixGraphBuilder::new(true).add(1.5, "music.wav").build().unwrap();
/// assert_eq!(
///     mix.text,
///     "[1:a]adelay=1500|1500[a1]; [0:a][a1]amix=inputs=2:duration=shortest[outa]"
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct MixGraphBuilder {
    primary_has_audio: bool,
    tracks: Vec<MixTrack>,
}

impl MixGraphBuilder {
    pub fn new(primary_has_audio: bool) -> Self {
        Self {
            primary_has_audio,
            tracks: Vec::new(),
        }
    }

    pub fn add<P: Into<PathBuf>>(mut self, start: f64, path: P) -> Self {
        self.tracks.push(MixTrack {
            start,
            path: path.into(),
        });
        self
    }

    pub fn tracks(&self) -> &[MixTrack] {
        &self.tracks
    }

    /// Fail on the first track whose file does not exist
    pub fn verify_inputs(&self) -> Result<(), MixError> {
        match self.tracks.iter().find(|track| !Path::new(&track.path).exists()) {
            Some(track) => Err(MixError::MissingFile {
                path: track.path.display().to_string(),
            }),
            None => Ok(()),
        }
    }

    pub fn build(&self) -> Result<MixGraph, MixError> {
        let mut statements = Vec::with_capacity(self.tracks.len() + 1);
        let mut sources = String::new();

        if self.primary_has_audio {
            sources.push_str("[0:a]");
        }

        for (position, track) in self.tracks.iter().enumerate() {
            if !(track.start.is_finite() && track.start >= 0.0) {
                return Err(MixError::NegativeDelay {
                    index: position,
                    start: track.start,
                });
            }

            let input = position + 1;
            let delay = track.delay_ms();
            debug!("Track {} ({}) delayed by {} ms", input, track.path.display(), delay);
            statements.push(format!("[{input}:a]adelay={delay}|{delay}[a{input}]"));
            sources.push_str(&format!("[a{input}]"));
        }

        let count = self.tracks.len() + usize::from(self.primary_has_audio);
        if count == 0 {
            return Err(MixError::NoAudioStreams);
        }

        statements.push(format!(
            "{}amix=inputs={}:duration=shortest[{}]",
            sources, count, MIX_OUTPUT_LABEL
        ));

        Ok(MixGraph {
            inputs: self.tracks.iter().map(|track| track.path.clone()).collect(),
            text: statements.join(STATEMENT_SEPARATOR),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_two_tracks() {
        let mix = MixGraphBuilder::new(true)
            .add(0.0, "a.wav")
            .add(2.0199, "b.mp3")
            .build()
            .unwrap();

        assert_eq!(
            mix.text,
            "[1:a]adelay=0|0[a1]; [2:a]adelay=2019|2019[a2]; \
             [0:a][a1][a2]amix=inputs=3:duration=shortest[outa]"
        );
        assert_eq!(mix.inputs, vec![PathBuf::from("a.wav"), PathBuf::from("b.mp3")]);
    }

    #[test]
    fn test_silent_primary() {
        let mix = MixGraphBuilder::new(false).add(1.0, "a.wav").build().unwrap();
        assert_eq!(mix.text, "[1:a]adelay=1000|1000[a1]; [a1]amix=inputs=1:duration=shortest[outa]");
    }

    #[test]
    fn test_nothing_to_mix() {
        assert_eq!(MixGraphBuilder::new(false).build(), Err(MixError::NoAudioStreams));
    }

    #[test]
    fn test_primary_only() {
        let mix = MixGraphBuilder::new(true).build().unwrap();
        assert_eq!(mix.text, "[0:a]amix=inputs=1:duration=shortest[outa]");
        assert!(mix.inputs.is_empty());
    }

    #[test]
    fn test_negative_start() {
        let err = MixGraphBuilder::new(true).add(1.0, "a.wav").add(-0.5, "b.wav").build();
        assert_eq!(err, Err(MixError::NegativeDelay { index: 1, start: -0.5 }));
    }

    #[test]
    fn test_verify_inputs() {
        let file = NamedTempFile::new().unwrap();
        let present = MixGraphBuilder::new(true).add(0.0, file.path());
        assert!(present.verify_inputs().is_ok());

        let missing = present.add(1.0, "/definitely/not/here.wav");
        assert!(matches!(missing.verify_inputs(), Err(MixError::MissingFile { .. })));
    }
}
