//! JSON-file-backed stores.
//!
//! Each store rewrites its backing file on every mutation via a
//! write-to-temp-then-rename, so a crash mid-write cannot truncate
//! existing history. Files are small (personal chat history), so whole-file
//! rewrites stay cheap.

use async_trait::async_trait;
use hearth_application::ports::chat_repository::{ChatRepository, RepositoryError};
use hearth_application::ports::user_repository::UserRepository;
use hearth_domain::{Chat, ChatId, Message, User};
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

fn load_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Option<T>, RepositoryError> {
    if !path.exists() {
        return Ok(None);
    }
    let data = std::fs::read_to_string(path)
        .map_err(|e| RepositoryError::Storage(format!("read {}: {e}", path.display())))?;
    serde_json::from_str(&data)
        .map(Some)
        .map_err(|e| RepositoryError::Storage(format!("parse {}: {e}", path.display())))
}

fn store_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<(), RepositoryError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .map_err(|e| RepositoryError::Storage(format!("create {}: {e}", parent.display())))?;
    }
    let data = serde_json::to_string_pretty(value)
        .map_err(|e| RepositoryError::Storage(e.to_string()))?;
    let tmp = path.with_extension("tmp");
    std::fs::write(&tmp, data)
        .map_err(|e| RepositoryError::Storage(format!("write {}: {e}", tmp.display())))?;
    std::fs::rename(&tmp, path)
        .map_err(|e| RepositoryError::Storage(format!("rename {}: {e}", path.display())))
}

/// Chat store persisted as one JSON file.
pub struct FileChatStore {
    path: PathBuf,
    chats: RwLock<Vec<Chat>>,
}

impl FileChatStore {
    /// Open (or create) the store at `path`.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, RepositoryError> {
        let path = path.into();
        let chats = load_json(&path)?.unwrap_or_default();
        Ok(Self {
            path,
            chats: RwLock::new(chats),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ChatRepository for FileChatStore {
    async fn create_chat(&self, title: &str) -> Result<Chat, RepositoryError> {
        let chat = Chat::new(title);
        let mut chats = self.chats.write().await;
        chats.push(chat.clone());
        store_json(&self.path, &*chats)?;
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
        store_json(&self.path, &*chats)
    }

    async fn delete_chat(&self, id: ChatId) -> Result<(), RepositoryError> {
        let mut chats = self.chats.write().await;
        let before = chats.len();
        chats.retain(|c| c.id != id);
        if chats.len() == before {
            return Err(RepositoryError::ChatNotFound(id));
        }
        store_json(&self.path, &*chats)
    }

    async fn delete_all(&self) -> Result<(), RepositoryError> {
        let mut chats = self.chats.write().await;
        chats.clear();
        store_json(&self.path, &*chats)
    }

    async fn count(&self) -> Result<usize, RepositoryError> {
        Ok(self.chats.read().await.len())
    }
}

/// User store persisted as one JSON file.
pub struct FileUserStore {
    path: PathBuf,
    users: RwLock<Vec<User>>,
}

impl FileUserStore {
    /// Open (or create) the store at `path`.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, RepositoryError> {
        let path = path.into();
        let users = load_json(&path)?.unwrap_or_default();
        Ok(Self {
            path,
            users: RwLock::new(users),
        })
    }
}

#[async_trait]
impl UserRepository for FileUserStore {
    async fn create_user(&self, user: User) -> Result<User, RepositoryError> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.username == user.username) {
            return Err(RepositoryError::UserExists(user.username));
        }
        users.push(user.clone());
        store_json(&self.path, &*users)?;
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
        let updated = user.clone();
        store_json(&self.path, &*users)?;
        Ok(updated)
    }
}
