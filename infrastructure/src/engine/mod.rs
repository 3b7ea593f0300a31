//! Local inference engine adapter.
//!
//! Implements the application's [`InferenceEngine`] port by spawning the
//! engine CLI (`ollama run <model>`) as a child process, delivering the
//! prompt on stdin and reading newline-delimited fragments from stdout.
//!
//! [`InferenceEngine`]: hearth_application::ports::engine::InferenceEngine

mod generation;
mod process;

pub use generation::OllamaGeneration;
pub use process::OllamaEngine;
