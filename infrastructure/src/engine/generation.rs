//! Engine output reader and process reaper.

use async_trait::async_trait;
use hearth_application::ports::engine::{EngineError, Generation};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, ChildStdout};
use tracing::debug;

/// One running generation: the child process plus a buffered reader over
/// its stdout.
///
/// Fragments are newline-delimited and keep their trailing newline; the
/// final fragment may lack one if the engine ends mid-line. Carriage
/// returns are stripped (SSE field values cannot carry them).
pub struct OllamaGeneration {
    child: Child,
    reader: BufReader<ChildStdout>,
}

impl OllamaGeneration {
    pub(crate) fn new(child: Child, reader: BufReader<ChildStdout>) -> Self {
        Self { child, reader }
    }
}

#[async_trait]
impl Generation for OllamaGeneration {
    async fn next_fragment(&mut self) -> Result<Option<String>, EngineError> {
        let mut line = String::new();
        match self.reader.read_line(&mut line).await {
            Ok(0) => {
                debug!("engine output stream ended");
                Ok(None)
            }
            Ok(_) => {
                if line.contains('\r') {
                    line = line.replace('\r', "");
                }
                Ok(Some(line))
            }
            Err(e) => Err(EngineError::Read(e.to_string())),
        }
    }

    async fn wait(mut self: Box<Self>) -> Result<(), EngineError> {
        let status = self
            .child
            .wait()
            .await
            .map_err(|e| EngineError::UpstreamExit(e.to_string()))?;
        if status.success() {
            Ok(())
        } else {
            Err(EngineError::UpstreamExit(status.to_string()))
        }
    }

    async fn abort(mut self: Box<Self>) {
        // kill() both signals and reaps (start_kill followed by wait).
        if let Err(e) = self.child.kill().await {
            debug!("failed to kill engine process: {e}");
        }
    }
}
