//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the config file and of
//! the `HEARTH_*` environment overrides.

use hearth_application::config::{PartialAnswerPolicy, StreamingParams};
use hearth_domain::ModelName;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error)]
pub enum ConfigValidationError {
    #[error("streaming.heartbeat_interval_secs cannot be 0")]
    InvalidHeartbeat,

    #[error("engine.model cannot be empty")]
    EmptyModelName,
}

/// HTTP server section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileServerConfig {
    /// Bind address
    pub address: String,
}

impl Default for FileServerConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1:8080".to_string(),
        }
    }
}

/// Inference engine section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileEngineConfig {
    /// Engine executable invoked as `<binary> run <model>`
    pub binary: String,
    /// Model tag
    pub model: String,
}

impl Default for FileEngineConfig {
    fn default() -> Self {
        Self {
            binary: "ollama".to_string(),
            model: "deepseek-r1:8b".to_string(),
        }
    }
}

/// Streaming section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileStreamingConfig {
    /// Seconds between keep-alive frames
    pub heartbeat_interval_secs: u64,
    /// Abort a stream after this many seconds without engine output
    pub idle_timeout_secs: Option<u64>,
    /// `persist` or `discard` for partial answers on failure
    pub partial_answer: PartialAnswerPolicy,
}

impl Default for FileStreamingConfig {
    fn default() -> Self {
        Self {
            heartbeat_interval_secs: 2,
            idle_timeout_secs: None,
            partial_answer: PartialAnswerPolicy::default(),
        }
    }
}

/// Storage section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileStorageConfig {
    /// Directory holding chats.json / users.json (platform data dir when
    /// unset)
    pub data_dir: Option<PathBuf>,
}

/// Local user section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileUserConfig {
    /// Username assumed when a request names none
    pub default_username: String,
}

impl Default for FileUserConfig {
    fn default() -> Self {
        Self {
            default_username: "local".to_string(),
        }
    }
}

/// Logging section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// Directory for daily-rolling log files (stderr only when unset)
    pub dir: Option<PathBuf>,
}

/// Top-level config file structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub server: FileServerConfig,
    pub engine: FileEngineConfig,
    pub streaming: FileStreamingConfig,
    pub storage: FileStorageConfig,
    pub user: FileUserConfig,
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.streaming.heartbeat_interval_secs == 0 {
            return Err(ConfigValidationError::InvalidHeartbeat);
        }
        if self.engine.model.trim().is_empty() {
            return Err(ConfigValidationError::EmptyModelName);
        }
        Ok(())
    }

    /// Convert the engine/streaming sections into application-layer
    /// parameters.
    pub fn streaming_params(&self) -> StreamingParams {
        StreamingParams {
            model: ModelName::new(self.engine.model.clone()),
            heartbeat_interval: Duration::from_secs(self.streaming.heartbeat_interval_secs),
            idle_timeout: self.streaming.idle_timeout_secs.map(Duration::from_secs),
            partial_answer: self.streaming.partial_answer,
        }
    }

    /// Resolved data directory (platform default when unset).
    pub fn data_dir(&self) -> PathBuf {
        self.storage.data_dir.clone().unwrap_or_else(|| {
            dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("hearth")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = FileConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.server.address, "127.0.0.1:8080");
        assert_eq!(config.engine.binary, "ollama");
    }

    #[test]
    fn zero_heartbeat_is_rejected() {
        let mut config = FileConfig::default();
        config.streaming.heartbeat_interval_secs = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::InvalidHeartbeat)
        ));
    }

    #[test]
    fn empty_model_is_rejected() {
        let mut config = FileConfig::default();
        config.engine.model = "  ".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::EmptyModelName)
        ));
    }

    #[test]
    fn streaming_params_map_the_sections() {
        let mut config = FileConfig::default();
        config.engine.model = "llama3:latest".to_string();
        config.streaming.heartbeat_interval_secs = 5;
        config.streaming.idle_timeout_secs = Some(90);

        let params = config.streaming_params();
        assert_eq!(params.model.as_str(), "llama3:latest");
        assert_eq!(params.heartbeat_interval, Duration::from_secs(5));
        assert_eq!(params.idle_timeout, Some(Duration::from_secs(90)));
    }
}
