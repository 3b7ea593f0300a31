//! Model value object naming the engine model to run.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Model tag handed to the inference engine (Value Object).
///
/// The engine accepts arbitrary tags (`deepseek-r1:8b`, `llama3:latest`,
/// ...), so this is a thin wrapper rather than a closed enum.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelName(String);

impl ModelName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ModelName {
    fn default() -> Self {
        Self("deepseek-r1:8b".to_string())
    }
}

impl fmt::Display for ModelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ModelName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for ModelName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displays_the_raw_tag() {
        let model = ModelName::new("llama3:latest");
        assert_eq!(model.to_string(), "llama3:latest");
        assert_eq!(model.as_str(), "llama3:latest");
    }

    #[test]
    fn serializes_transparently() {
        let model = ModelName::default();
        let json = serde_json::to_string(&model).unwrap();
        assert_eq!(json, "\"deepseek-r1:8b\"");
    }
}
