use std::path::Path;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Main configuration for fxgraph
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Graph compiler settings
    pub compiler: CompilerConfig,

    /// External renderer settings
    pub render: RenderConfig,

    /// Batch compilation settings
    pub batch: BatchConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound { path: path.display().to_string() })?;

        let config: Config = toml::from_str(&content)
            .map_err(|_| ConfigError::ParseFailed { path: path.display().to_string() })?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::InvalidValue {
                key: "config".to_string(),
                value: e.to_string()
            })?;

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.compiler.validate()?;
        self.render.validate()?;
        self.batch.validate()?;
        Ok(())
    }
}

/// What to do when a timeline has no effects left to apply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyTimeline {
    /// Tell the caller to copy the input file unchanged
    #[default]
    CopyInput,

    /// Emit a single full-duration passthrough graph
    Passthrough,
}

/// How to treat effects whose windows overlap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlapPolicy {
    /// Fail the compile with a parse error
    #[default]
    Reject,

    /// Clip the earlier effect so the later-starting one wins
    Truncate,
}

/// Graph compiler configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// Stream every fragment trims from
    pub video_input: String,

    /// Secondary stream used by overlay-style effects
    pub overlay_input: String,

    /// Policy for timelines with nothing to apply
    pub empty_timeline: EmptyTimeline,

    /// Policy for overlapping effect windows
    pub overlaps: OverlapPolicy,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            video_input: "0:v".to_string(),
            overlay_input: "1:v".to_string(),
            empty_timeline: EmptyTimeline::default(),
            overlaps: OverlapPolicy::default(),
        }
    }
}

impl CompilerConfig {
    fn validate(&self) -> Result<()> {
        for (key, value) in [
            ("compiler.video_input", &self.video_input),
            ("compiler.overlay_input", &self.overlay_input),
        ] {
            if value.is_empty() || value.contains(&['[', ']', ';', ','][..]) {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    value: value.clone()
                }.into());
            }
        }

        Ok(())
    }
}

/// External renderer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Renderer executable
    pub ffmpeg: String,

    /// Prober executable
    pub ffprobe: String,

    /// Video codec for re-encoded output
    pub video_codec: String,

    /// Copy the primary audio track into effect renders
    pub keep_audio: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            ffmpeg: "ffmpeg".to_string(),
            ffprobe: "ffprobe".to_string(),
            video_codec: "libx265".to_string(),
            keep_audio: true,
        }
    }
}

impl RenderConfig {
    fn validate(&self) -> Result<()> {
        if self.ffmpeg.is_empty() {
            return Err(ConfigError::MissingKey { key: "render.ffmpeg".to_string() }.into());
        }

        if self.ffprobe.is_empty() {
            return Err(ConfigError::MissingKey { key: "render.ffprobe".to_string() }.into());
        }

        if self.video_codec.is_empty() {
            return Err(ConfigError::MissingKey { key: "render.video_codec".to_string() }.into());
        }

        Ok(())
    }
}

/// Batch compilation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Worker threads for parallel compiles
    pub threads: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            threads: num_cpus::get(),
        }
    }
}

impl BatchConfig {
    fn validate(&self) -> Result<()> {
        if self.threads == 0 {
            return Err(ConfigError::InvalidValue {
                key: "batch.threads".to_string(),
                value: self.threads.to_string()
            }.into());
        }

        Ok(())
    }
}
