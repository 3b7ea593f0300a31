//! User persistence port.

use super::chat_repository::RepositoryError;
use async_trait::async_trait;
use hearth_domain::User;

/// Persistence for user profiles and settings.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user. Fails with [`RepositoryError::UserExists`] when
    /// the username is taken.
    async fn create_user(&self, user: User) -> Result<User, RepositoryError>;

    async fn get_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError>;

    /// Overwrite the stored about-me and preferences texts, returning the
    /// updated user.
    async fn update_settings(
        &self,
        username: &str,
        about_me: &str,
        preferences: &str,
    ) -> Result<User, RepositoryError>;
}
