//! Chat management — listing, deletion, and greeting recreation.

use crate::ports::chat_repository::{ChatRepository, RepositoryError};
use hearth_domain::{Chat, ChatId, Message};
use std::sync::Arc;
use tracing::info;

const GREETING_TITLE: &str = "Greet User";
const GREETING: &str = "Hi, I'm Hearth, an assistant running completely locally on your machine \
                        with no external dependencies.";

/// Use case for the chat management endpoints.
pub struct ManageChatsUseCase {
    chats: Arc<dyn ChatRepository>,
}

impl ManageChatsUseCase {
    pub fn new(chats: Arc<dyn ChatRepository>) -> Self {
        Self { chats }
    }

    pub async fn list(&self) -> Result<Vec<Chat>, RepositoryError> {
        self.chats.list_chats().await
    }

    /// Delete one chat. If the store is left empty, a fresh greeting chat
    /// is created so the client never renders an empty chat list. The
    /// count is recomputed from the repository, not tracked across
    /// requests.
    pub async fn delete(&self, id: ChatId) -> Result<(), RepositoryError> {
        self.chats.delete_chat(id).await?;
        if self.chats.count().await? == 0 {
            self.create_greeting_chat().await?;
        }
        Ok(())
    }

    pub async fn delete_all(&self) -> Result<(), RepositoryError> {
        self.chats.delete_all().await?;
        self.create_greeting_chat().await?;
        Ok(())
    }

    /// Seed a chat containing a single assistant greeting.
    pub async fn create_greeting_chat(&self) -> Result<Chat, RepositoryError> {
        let chat = self.chats.create_chat(GREETING_TITLE).await?;
        self.chats
            .append_message(chat.id, Message::assistant(GREETING))
            .await?;
        info!(chat = %chat.id, "greeting chat created");
        self.chats.get_chat(chat.id).await
    }
}
