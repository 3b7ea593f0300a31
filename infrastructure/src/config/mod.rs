//! Configuration loading and file formats.

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileConfig, FileEngineConfig, FileLoggingConfig, FileServerConfig,
    FileStorageConfig, FileStreamingConfig, FileUserConfig,
};
pub use loader::ConfigLoader;
