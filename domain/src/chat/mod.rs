//! Chat aggregate: chats, messages, and their identifiers.

mod entities;
mod id;

pub use entities::{Chat, Message, Role};
pub use id::{ChatId, ParseChatIdError};
