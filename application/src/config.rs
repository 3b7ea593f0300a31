//! Application-level streaming parameters.

use hearth_domain::ModelName;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// What to do with a partially accumulated answer when a session ends in
/// `Disconnected` or `UpstreamError`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartialAnswerPolicy {
    /// Persist whatever non-empty text was relayed before the failure.
    #[default]
    Persist,
    /// Persist only answers from sessions that completed normally.
    Discard,
}

/// Tunables for one streaming exchange.
#[derive(Debug, Clone)]
pub struct StreamingParams {
    /// Model tag handed to the engine.
    pub model: ModelName,
    /// Keep-alive cadence while fragments are scarce.
    pub heartbeat_interval: Duration,
    /// Surface an upstream error if the engine produces nothing for this
    /// long. `None` trusts the engine not to stall.
    pub idle_timeout: Option<Duration>,
    /// Persistence policy for partial answers.
    pub partial_answer: PartialAnswerPolicy,
}

impl Default for StreamingParams {
    fn default() -> Self {
        Self {
            model: ModelName::default(),
            heartbeat_interval: Duration::from_secs(2),
            idle_timeout: None,
            partial_answer: PartialAnswerPolicy::default(),
        }
    }
}
