//! User entity and prompt personalization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An application user with profile settings (Entity).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub username: String,
    pub about_me: String,
    pub preferences: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(username: impl Into<String>, about_me: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            username: username.into(),
            about_me: about_me.into(),
            preferences: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Prefix `prompt` with the user's stored profile so the model can use
    /// personal context when answering. Returns the prompt unchanged when
    /// no profile text is set.
    pub fn aware_prompt(&self, prompt: &str) -> String {
        let mut info = Vec::new();
        if !self.about_me.is_empty() {
            info.push(format!("About Me: {}", self.about_me));
        }
        if !self.preferences.is_empty() {
            info.push(format!("Preference: {}", self.preferences));
        }

        if info.is_empty() {
            return prompt.to_string();
        }

        format!(
            "User info: {}. If required, use this knowledge before answering the question.\n\n{}",
            info.join(", "),
            prompt
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aware_prompt_without_profile_is_unchanged() {
        let user = User::new("local", "");
        assert_eq!(user.aware_prompt("hello"), "hello");
    }

    #[test]
    fn aware_prompt_includes_about_me_and_preferences() {
        let mut user = User::new("local", "I write Rust");
        user.preferences = "short answers".to_string();

        let prompt = user.aware_prompt("what is a lifetime?");
        assert!(prompt.starts_with("User info: About Me: I write Rust, Preference: short answers"));
        assert!(prompt.ends_with("what is a lifetime?"));
    }

    #[test]
    fn aware_prompt_skips_empty_fields() {
        let user = User::new("local", "I write Rust");
        let prompt = user.aware_prompt("hi");
        assert!(prompt.contains("About Me"));
        assert!(!prompt.contains("Preference"));
    }
}
