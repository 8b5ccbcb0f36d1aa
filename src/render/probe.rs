use std::path::Path;

use tracing::debug;

use crate::{
    config::RenderConfig,
    error::{RenderError, Result},
    render::{runner, RenderCommand},
};

fn ffprobe(config: &RenderConfig, path: &Path, select: &str, entries: &str, format: &str) -> RenderCommand {
    RenderCommand::new(config.ffprobe.as_str())
        .args(["-v", "error", "-select_streams", select, "-show_entries", entries, "-of", format])
        .arg(path.to_string_lossy())
}

/// Parse ffprobe's `format=duration` output
pub fn parse_duration(path: &Path, output: &str) -> Result<f64> {
    let text = output.trim();
    match text.parse::<f64>() {
        Ok(duration) if duration.is_finite() && duration >= 0.0 => Ok(duration),
        _ => Err(RenderError::Probe {
            path: path.display().to_string(),
            reason: format!("unexpected duration '{}'", text),
        }
        .into()),
    }
}

/// Container duration in seconds
pub async fn probe_duration(config: &RenderConfig, path: &Path) -> Result<f64> {
    let command = ffprobe(config, path, "v:0", "format=duration", "default=noprint_wrappers=1:nokey=1");
    let output = runner::capture(&command).await?;
    let duration = parse_duration(path, &output)?;
    debug!("{} is {}s long", path.display(), duration);
    Ok(duration)
}

/// Whether the file has at least one audio stream
///
/// A file ffprobe cannot read is reported as having no audio.
pub async fn has_audio_stream(config: &RenderConfig, path: &Path) -> Result<bool> {
    let command = ffprobe(config, path, "a", "stream=index", "csv=p=0");
    match runner::capture(&command).await {
        Ok(output) => Ok(!output.trim().is_empty()),
        Err(crate::error::FxGraphError::Render(RenderError::Failed { .. })) => Ok(false),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration() {
        let path = Path::new("clip.mp4");
        assert_eq!(parse_duration(path, "12.480000\n").unwrap(), 12.48);
        assert!(parse_duration(path, "N/A").is_err());
        assert!(parse_duration(path, "").is_err());
    }

    #[test]
    fn test_probe_arguments() {
        let command = ffprobe(&RenderConfig::default(), Path::new("clip.mp4"), "a", "stream=index", "csv=p=0");
        assert_eq!(command.program, "ffprobe");
        assert_eq!(
            command.args,
            vec!["-v", "error", "-select_streams", "a", "-show_entries", "stream=index", "-of", "csv=p=0", "clip.mp4"]
        );
    }

    #[tokio::test]
    async fn test_missing_prober_is_spawn_error() {
        let config = RenderConfig { ffprobe: "fxgraph-no-such-prober".into(), ..RenderConfig::default() };
        let err = probe_duration(&config, Path::new("clip.mp4")).await.unwrap_err();
        assert!(matches!(err, crate::error::FxGraphError::Render(RenderError::Spawn { .. })));
    }
}
