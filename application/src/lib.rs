//! Application layer for hearth
//!
//! This crate contains use cases, port definitions, and the per-request
//! streaming coordination. It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod streaming;
pub mod use_cases;

// Re-export commonly used types
pub use config::{PartialAnswerPolicy, StreamingParams};
pub use ports::chat_repository::{ChatRepository, RepositoryError};
pub use ports::engine::{EngineError, Generation, InferenceEngine};
pub use ports::relay::{ClientGone, EventRelay};
pub use ports::user_repository::UserRepository;
pub use streaming::{CompletionSignal, SessionOutcome, StreamSession};
pub use use_cases::manage_chats::ManageChatsUseCase;
pub use use_cases::manage_user::{CreateUserInput, ManageUserUseCase, UpdateSettingsInput};
pub use use_cases::send_message::{
    PendingStream, SendMessageError, SendMessageInput, SendMessageUseCase,
};

#[cfg(test)]
pub(crate) mod testing;
