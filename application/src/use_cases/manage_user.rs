//! User settings management.

use crate::ports::chat_repository::RepositoryError;
use crate::ports::user_repository::UserRepository;
use hearth_domain::User;
use std::sync::Arc;

/// Input for [`ManageUserUseCase::create`].
#[derive(Debug, Clone, Default)]
pub struct CreateUserInput {
    /// Falls back to the configured default username.
    pub username: Option<String>,
    pub about_me: String,
}

/// Input for [`ManageUserUseCase::update_settings`].
#[derive(Debug, Clone, Default)]
pub struct UpdateSettingsInput {
    /// Falls back to the configured default username.
    pub username: Option<String>,
    pub about_me: String,
    pub preferences: String,
}

/// Use case for the user settings endpoints.
pub struct ManageUserUseCase {
    users: Arc<dyn UserRepository>,
    default_username: String,
}

impl ManageUserUseCase {
    pub fn new(users: Arc<dyn UserRepository>, default_username: impl Into<String>) -> Self {
        Self {
            users,
            default_username: default_username.into(),
        }
    }

    pub async fn get_settings(&self, username: Option<&str>) -> Result<User, RepositoryError> {
        let username = username.unwrap_or(&self.default_username);
        self.users
            .get_by_username(username)
            .await?
            .ok_or_else(|| RepositoryError::UserNotFound(username.to_string()))
    }

    pub async fn create(&self, input: CreateUserInput) -> Result<User, RepositoryError> {
        let username = input
            .username
            .unwrap_or_else(|| self.default_username.clone());
        if self.users.get_by_username(&username).await?.is_some() {
            return Err(RepositoryError::UserExists(username));
        }
        self.users
            .create_user(User::new(username, input.about_me))
            .await
    }

    /// Overwrite the stored settings (not append to them).
    pub async fn update_settings(&self, input: UpdateSettingsInput) -> Result<User, RepositoryError> {
        let username = input
            .username
            .unwrap_or_else(|| self.default_username.clone());
        self.users
            .update_settings(&username, &input.about_me, &input.preferences)
            .await
    }
}
