use thiserror::Error;

/// Main error type for the fxgraph library
#[derive(Error, Debug)]
pub enum FxGraphError {
    #[error("Timeline parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Effect parameter error: {0}")]
    Param(#[from] ParamError),

    #[error("Blend error: {0}")]
    Blend(#[from] BlendError),

    #[error("Audio mix error: {0}")]
    Mix(#[from] MixError),

    #[error("Sync error: {0}")]
    Sync(#[from] SyncError),

    #[error("Edit error: {0}")]
    Edit(#[from] EditError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Generic error: {0}")]
    Generic(String),
}

/// Errors raised while turning raw effect items into sorted specs
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Malformed effect item {index}: {reason}")]
    Malformed { index: usize, reason: String },

    #[error("Invalid time in effect item {index}: {reason}")]
    InvalidTime { index: usize, reason: String },

    #[error("Effect item {index} overlaps effect item {previous}")]
    Overlap { index: usize, previous: usize },
}

impl ParseError {
    /// Input position of the offending item
    pub fn index(&self) -> usize {
        match self {
            Self::Malformed { index, .. }
            | Self::InvalidTime { index, .. }
            | Self::Overlap { index, .. } => *index,
        }
    }
}

/// Per-kind parameter validation errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParamError {
    #[error("Effect '{kind}' (item {index}) expects at least {expected} parameters, got {got}")]
    Arity {
        kind: String,
        index: usize,
        expected: usize,
        got: usize,
    },

    #[error("Effect '{kind}' (item {index}): invalid value '{value}' for {param}")]
    Type {
        kind: String,
        index: usize,
        param: String,
        value: String,
    },
}

/// Blend-specific errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BlendError {
    #[error("Unknown blend phase: {phase} (expected 1-4)")]
    Phase { phase: i64 },
}

/// Audio mix graph errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MixError {
    #[error("No audio streams available to mix")]
    NoAudioStreams,

    #[error("Mix track {index} has a negative start time: {start}")]
    NegativeDelay { index: usize, start: f64 },

    #[error("Audio file not found: {path}")]
    MissingFile { path: String },
}

/// Sync graph errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SyncError {
    #[error("Invalid splice segment {start}-{end}: start must be positive and before end")]
    InvalidSegment { start: f64, end: f64 },

    #[error("Invalid cue window {cue}-{end}: cue end must be after the cue")]
    InvalidCue { cue: f64, end: f64 },
}

/// Stream-copy edit errors (split, adjust, audio loop)
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditError {
    #[error("No segments given")]
    NoSegments,

    #[error("Segment {number} has invalid times {start}-{end}")]
    InvalidSegment { number: usize, start: f64, end: f64 },

    #[error("Adjusted window {start}-{end} is empty")]
    EmptyWindow { start: f64, end: f64 },

    #[error("Audio loop needs cut duration, loop start, loop end and loop total together")]
    IncompleteLoop,

    #[error("Invalid audio loop {start}-{end} for a total of {total}s")]
    InvalidLoop { start: f64, end: f64, total: f64 },
}

/// Errors from the external renderer and prober
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to launch {program}: {reason}")]
    Spawn { program: String, reason: String },

    #[error("{program} exited with status {status}")]
    Failed { program: String, status: String },

    #[error("Could not probe {path}: {reason}")]
    Probe { path: String, reason: String },

    #[error("Graph reads [{stream}] but no input was given for it")]
    MissingInput { stream: String },
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration file: {path}")]
    ParseFailed { path: String },

    #[error("Invalid configuration value: {key} = {value}")]
    InvalidValue { key: String, value: String },

    #[error("Missing required configuration: {key}")]
    MissingKey { key: String },

    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },
}

/// Convenience type alias for Results using FxGraphError
pub type Result<T> = std::result::Result<T, FxGraphError>;

impl FxGraphError {
    /// Create a generic error with a custom message
    pub fn generic<S: Into<String>>(message: S) -> Self {
        Self::Generic(message.into())
    }

    /// Check if this error is recoverable (can be retried)
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Io(_) => true,
            // The renderer may have been killed or briefly unavailable
            Self::Render(RenderError::Spawn { .. }) => true,
            Self::Render(RenderError::Failed { .. }) => true,
            // Invalid timelines stay invalid
            _ => false,
        }
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::Parse(ParseError::Overlap { index, previous }) => {
                format!(
                    "Effect {} starts before effect {} ends. Shorten one of them or set compiler.overlaps = \"truncate\".",
                    index, previous
                )
            }
            Self::Param(ParamError::Arity { kind, expected, got, .. }) => {
                format!(
                    "Effect '{}' needs {} parameters but {} were given. Run `fxgraph kinds` for the parameter list.",
                    kind, expected, got
                )
            }
            Self::Render(RenderError::Spawn { program, .. }) => {
                format!("Could not run '{}'. Please check it is installed and on PATH.", program)
            }
            Self::Render(RenderError::MissingInput { stream }) => {
                format!("An effect reads the overlay stream [{}]. Pass the overlay file with --overlay FILE.", stream)
            }
            Self::Config(ConfigError::FileNotFound { path }) => {
                format!("Configuration file '{}' not found.", path)
            }
            _ => self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_index() {
        let err = ParseError::InvalidTime { index: 3, reason: "x".into() };
        assert_eq!(err.index(), 3);
        assert_eq!(ParseError::Overlap { index: 2, previous: 1 }.index(), 2);
    }

    #[test]
    fn test_wrapping_and_recoverability() {
        let err: FxGraphError = BlendError::Phase { phase: 9 }.into();
        assert!(!err.is_recoverable());
        assert!(err.to_string().contains("9"));

        let err: FxGraphError = RenderError::Failed {
            program: "ffmpeg".into(),
            status: "1".into(),
        }
        .into();
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_user_message_mentions_kind() {
        let err: FxGraphError = ParamError::Arity {
            kind: "eq".into(),
            index: 0,
            expected: 4,
            got: 1,
        }
        .into();
        assert!(err.user_message().contains("'eq'"));
    }
}
