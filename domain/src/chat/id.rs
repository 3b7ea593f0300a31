//! Chat identifier value object.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Error returned when a chat identifier on the wire does not parse.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid chat id: {0:?}")]
pub struct ParseChatIdError(pub String);

/// Identifier of a [`Chat`](super::Chat) (Value Object).
///
/// Rendered as 32 hex characters on the wire; anything else is rejected at
/// the API boundary before any work happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChatId(#[serde(with = "uuid::serde::simple")] Uuid);

impl ChatId {
    /// Generate a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

impl FromStr for ChatId {
    type Err = ParseChatIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Only the 32-char hex form is accepted; hyphenated UUIDs are not
        // valid wire identifiers.
        if s.len() != 32 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ParseChatIdError(s.to_string()));
        }
        Uuid::try_parse(s)
            .map(Self)
            .map_err(|_| ParseChatIdError(s.to_string()))
    }
}
