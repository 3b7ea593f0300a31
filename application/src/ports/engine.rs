//! Inference engine port.
//!
//! Defines how the application layer talks to the local text-generation
//! engine. The production adapter lives in the infrastructure layer and
//! spawns an `ollama run` child process; tests substitute scripted fakes.

use async_trait::async_trait;
use hearth_domain::ModelName;
use thiserror::Error;

/// Errors surfaced by the engine collaborator.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The engine binary could not be started or its pipes attached.
    #[error("failed to launch inference engine: {0}")]
    Launch(String),

    /// The engine process exited abnormally.
    #[error("inference engine exited abnormally: {0}")]
    UpstreamExit(String),

    /// Reading the engine's output failed mid-stream. Distinct from a
    /// normal end of stream.
    #[error("failed to read engine output: {0}")]
    Read(String),
}

/// A running generation: the engine's output stream plus the obligation to
/// reap the underlying process.
///
/// Exactly one of [`wait`](Generation::wait) or [`abort`](Generation::abort)
/// must be invoked on every exit path, or the child process leaks.
#[async_trait]
pub trait Generation: Send {
    /// Yield the next newline-delimited fragment, or `Ok(None)` at the end
    /// of the stream. Fragments retain their trailing newline.
    async fn next_fragment(&mut self) -> Result<Option<String>, EngineError>;

    /// Wait for the engine process to exit naturally and reap it.
    async fn wait(self: Box<Self>) -> Result<(), EngineError>;

    /// Terminate the engine process without waiting for it to finish, then
    /// reap it. Used once the client has gone away.
    async fn abort(self: Box<Self>);
}

/// Gateway to the local inference engine.
#[async_trait]
pub trait InferenceEngine: Send + Sync {
    /// Spawn a generation for `prompt` on `model`.
    ///
    /// The prompt is delivered in full over the engine's input channel
    /// before any output is consumed.
    async fn generate(
        &self,
        prompt: &str,
        model: &ModelName,
    ) -> Result<Box<dyn Generation>, EngineError>;
}
