use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::{error::{RenderError, Result}, render::RenderCommand};

/// Run a renderer command to completion, inheriting stdio
pub async fn run(command: &RenderCommand) -> Result<()> {
    info!("▶️  Running {}", command.program);
    debug!("{}", command);

    let status = Command::new(&command.program)
        .args(&command.args)
        .status()
        .await
        .map_err(|e| RenderError::Spawn {
            program: command.program.clone(),
            reason: e.to_string(),
        })?;

    if !status.success() {
        warn!("{} failed with {}", command.program, status);
        return Err(RenderError::Failed {
            program: command.program.clone(),
            status: status
                .code()
                .map(|code| code.to_string())
                .unwrap_or_else(|| "signal".to_string()),
        }
        .into());
    }

    Ok(())
}

/// Run a command and capture its stdout as text
pub(crate) async fn capture(command: &RenderCommand) -> Result<String> {
    debug!("{}", command);

    let output = Command::new(&command.program)
        .args(&command.args)
        .output()
        .await
        .map_err(|e| RenderError::Spawn {
            program: command.program.clone(),
            reason: e.to_string(),
        })?;

    if !output.status.success() {
        return Err(RenderError::Failed {
            program: command.program.clone(),
            status: output
                .status
                .code()
                .map(|code| code.to_string())
                .unwrap_or_else(|| "signal".to_string()),
        }
        .into());
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FxGraphError;

    #[tokio::test]
    async fn test_success() {
        let command = RenderCommand::new("sh").args(["-c", "exit 0"]);
        assert!(run(&command).await.is_ok());
    }

    #[tokio::test]
    async fn test_non_zero_exit() {
        let command = RenderCommand::new("sh").args(["-c", "exit 3"]);
        match run(&command).await {
            Err(FxGraphError::Render(RenderError::Failed { program, status })) => {
                assert_eq!(program, "sh");
                assert_eq!(status, "3");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_program() {
        let command = RenderCommand::new("fxgraph-no-such-renderer");
        let err = run(&command).await.unwrap_err();
        assert!(matches!(err, FxGraphError::Render(RenderError::Spawn { .. })));
        assert!(err.is_recoverable());
    }

    #[tokio::test]
    async fn test_capture_stdout() {
        let command = RenderCommand::new("sh").args(["-c", "echo 12.5"]);
        assert_eq!(capture(&command).await.unwrap().trim(), "12.5");
    }
}
