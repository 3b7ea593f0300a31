//! In-memory stores.

use async_trait::async_trait;
use hearth_application::ports::chat_repository::{ChatRepository, RepositoryError};
use hearth_application::ports::user_repository::UserRepository;
use hearth_domain::{Chat, ChatId, Message, User};
use tokio::sync::RwLock;

/// Chat store backed by a process-local list, in creation order.
#[derive(Default)]
pub struct MemoryChatStore {
    chats: RwLock<Vec<Chat>>,
}

impl MemoryChatStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ChatRepository for MemoryChatStore {
    async fn create_chat(&self, title: &str) -> Result<Chat, RepositoryError> {
        let chat = Chat::new(title);
        self.chats.write().await.push(chat.clone());
        Ok(chat)
    }

    async fn get_chat(&self, id: ChatId) -> Result<Chat, RepositoryError> {
        self.chats
            .read()
            .await
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or(RepositoryError::ChatNotFound(id))
    }

    async fn list_chats(&self) -> Result<Vec<Chat>, RepositoryError> {
        Ok(self.chats.read().await.clone())
    }

    async fn append_message(&self, id: ChatId, message: Message) -> Result<(), RepositoryError> {
        let mut chats = self.chats.write().await;
        let chat = chats
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(RepositoryError::ChatNotFound(id))?;
        chat.push_message(message);
        Ok(())
    }

    async fn delete_chat(&self, id: ChatId) -> Result<(), RepositoryError> {
        let mut chats = self.chats.write().await;
        let before = chats.len();
        chats.retain(|c| c.id != id);
        if chats.len() == before {
            return Err(RepositoryError::ChatNotFound(id));
        }
        Ok(())
    }

    async fn delete_all(&self) -> Result<(), RepositoryError> {
        self.chats.write().await.clear();
        Ok(())
    }

    async fn count(&self) -> Result<usize, RepositoryError> {
        Ok(self.chats.read().await.len())
    }
}

/// User store backed by a process-local list.
#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<Vec<User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryUserStore {
    async fn create_user(&self, user: User) -> Result<User, RepositoryError> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.username == user.username) {
            return Err(RepositoryError::UserExists(user.username));
        }
        users.push(user.clone());
        Ok(user)
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError> {
        Ok(self
            .users
            .read()
            .await
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn update_settings(
        &self,
        username: &str,
        about_me: &str,
        preferences: &str,
    ) -> Result<User, RepositoryError> {
        let mut users = self.users.write().await;
        let user = users
            .iter_mut()
            .find(|u| u.username == username)
            .ok_or_else(|| RepositoryError::UserNotFound(username.to_string()))?;
        user.about_me = about_me.to_string();
        user.preferences = preferences.to_string();
        user.updated_at = chrono::Utc::now();
        Ok(user.clone())
    }
}
