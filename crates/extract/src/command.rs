use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use serde_json::Value;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use crate::engine::{EngineError, EngineParams, ExtractionEngine};

/// Runs an external program per request.
///
/// The program receives its configured args followed by the raw file path,
/// reads [`EngineParams`] as JSON on stdin and prints the result as JSON on
/// stdout. A non-zero exit is a failure; stderr becomes the message.
#[derive(Debug, Clone)]
pub struct CommandEngine {
    program: PathBuf,
    args: Vec<String>,
}

impl CommandEngine {
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

#[async_trait]
impl ExtractionEngine for CommandEngine {
    fn name(&self) -> &str {
        "command"
    }

    async fn extract(&self, file: &Path, params: &EngineParams) -> Result<Value, EngineError> {
        let payload = serde_json::to_vec(params)?;

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .arg(file)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            // An engine that exits early closes its end. Its exit status and
            // stderr, collected below, carry the cause.
            match stdin.write_all(&payload).await {
                Ok(()) => {}
                Err(err) if err.kind() == ErrorKind::BrokenPipe => {
                    debug!(program = %self.program.display(), "Engine closed stdin early");
                }
                Err(err) => return Err(err.into()),
            }
            // Dropping stdin closes the pipe so the engine sees EOF.
        }

        let output = child.wait_with_output().await?;
        debug!(
            program = %self.program.display(),
            status = %output.status,
            stdout_bytes = output.stdout.len(),
            "Engine process finished"
        );

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stderr = stderr.trim();
            return Err(if stderr.is_empty() {
                EngineError::failed(format!("engine exited with {}", output.status))
            } else {
                EngineError::failed(stderr.lines().last().unwrap_or(stderr))
            });
        }

        Ok(serde_json::from_slice(&output.stdout)?)
    }
}
