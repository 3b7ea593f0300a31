//! Chat persistence port.

use async_trait::async_trait;
use hearth_domain::{Chat, ChatId, Message};
use thiserror::Error;

/// Errors surfaced by the persistence collaborator.
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("chat not found: {0}")]
    ChatNotFound(ChatId),

    #[error("user not found: {0}")]
    UserNotFound(String),

    #[error("user already exists: {0}")]
    UserExists(String),

    #[error("storage error: {0}")]
    Storage(String),
}

/// Persistence sink for chats.
///
/// The streaming core only ever appends through this interface — once for
/// the user message before streaming begins, at most once for the
/// assistant message after the session terminates. The other operations
/// back the management endpoints.
#[async_trait]
pub trait ChatRepository: Send + Sync {
    async fn create_chat(&self, title: &str) -> Result<Chat, RepositoryError>;

    async fn get_chat(&self, id: ChatId) -> Result<Chat, RepositoryError>;

    async fn list_chats(&self) -> Result<Vec<Chat>, RepositoryError>;

    async fn append_message(&self, id: ChatId, message: Message) -> Result<(), RepositoryError>;

    async fn delete_chat(&self, id: ChatId) -> Result<(), RepositoryError>;

    async fn delete_all(&self) -> Result<(), RepositoryError>;

    async fn count(&self) -> Result<usize, RepositoryError>;
}
