//! Engine process launcher.

use crate::engine::generation::OllamaGeneration;
use async_trait::async_trait;
use hearth_application::ports::engine::{EngineError, Generation, InferenceEngine};
use hearth_domain::ModelName;
use std::process::Stdio;
use tokio::io::{AsyncWriteExt, BufReader};
use tokio::process::Command;
use tracing::{debug, warn};

/// Launches the local inference engine as a child process.
///
/// The engine is invoked as `<binary> run <model>`. The whole prompt is
/// written to its stdin and the pipe closed before any output is read, so
/// there is no interleaved write/read on the child's channels.
pub struct OllamaEngine {
    binary: String,
}

impl OllamaEngine {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Surface a missing engine binary at startup instead of on the first
    /// request. Launches fail with [`EngineError::Launch`] either way.
    pub fn check_available(&self) -> bool {
        let found = which::which(&self.binary).is_ok();
        if !found {
            warn!(
                "inference engine binary {:?} not found on PATH; chat requests will fail",
                self.binary
            );
        }
        found
    }
}

impl Default for OllamaEngine {
    fn default() -> Self {
        Self::new("ollama")
    }
}

#[async_trait]
impl InferenceEngine for OllamaEngine {
    async fn generate(
        &self,
        prompt: &str,
        model: &ModelName,
    ) -> Result<Box<dyn Generation>, EngineError> {
        debug!(model = %model, "spawning inference engine");

        let mut cmd = Command::new(&self.binary);
        cmd.arg("run")
            .arg(model.as_str())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null());

        // Linux: request kernel to send SIGTERM to the child when the
        // parent dies. This catches cases where reaping never runs
        // (SIGKILL, OOM kill).
        #[cfg(target_os = "linux")]
        unsafe {
            cmd.pre_exec(|| {
                libc::prctl(libc::PR_SET_PDEATHSIG, libc::SIGTERM);
                Ok(())
            });
        }

        let mut child = cmd
            .spawn()
            .map_err(|e| EngineError::Launch(format!("{}: {e}", self.binary)))?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| EngineError::Launch("failed to capture engine stdin".into()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| EngineError::Launch("failed to capture engine stdout".into()))?;

        // Dropping stdin after the write closes the pipe and signals end
        // of input to the engine.
        stdin
            .write_all(prompt.as_bytes())
            .await
            .map_err(|e| EngineError::Launch(format!("failed to deliver prompt: {e}")))?;
        stdin
            .shutdown()
            .await
            .map_err(|e| EngineError::Launch(format!("failed to close engine stdin: {e}")))?;
        drop(stdin);

        Ok(Box::new(OllamaGeneration::new(
            child,
            BufReader::new(stdout),
        )))
    }
}
