//! Send-message use case — one streaming exchange.
//!
//! Split into two phases so the HTTP layer can reject bad requests with a
//! proper status before the response switches to an event stream:
//!
//! 1. [`begin`](SendMessageUseCase::begin) validates the request, resolves
//!    the target chat, and persists the user message. No engine process is
//!    spawned here; a rejected request costs nothing.
//! 2. [`stream`](SendMessageUseCase::stream) spawns the engine, drives a
//!    [`StreamSession`] to a terminal state, settles persistence per the
//!    partial-answer policy, and emits the terminal frame.

use crate::config::{PartialAnswerPolicy, StreamingParams};
use crate::ports::chat_repository::{ChatRepository, RepositoryError};
use crate::ports::engine::InferenceEngine;
use crate::ports::relay::EventRelay;
use crate::ports::user_repository::UserRepository;
use crate::streaming::{SessionOutcome, StreamSession};
use hearth_domain::{ChatId, Message, SessionState};
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};

/// Title given to chats created implicitly by a send-message request.
const NEW_CHAT_TITLE: &str = "New Chat";

/// Errors that reject a send-message request before streaming begins.
#[derive(Error, Debug)]
pub enum SendMessageError {
    #[error("user prompt is required")]
    EmptyMessage,

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Input for [`SendMessageUseCase::begin`].
#[derive(Debug, Clone)]
pub struct SendMessageInput {
    /// The user's prompt.
    pub message: String,
    /// Target chat; `None` creates a new one.
    pub chat_id: Option<ChatId>,
}

/// A validated exchange, ready to stream.
#[derive(Debug, Clone)]
pub struct PendingStream {
    pub chat_id: ChatId,
    /// The engine prompt — the user's message, personalized with the
    /// stored profile of the configured local user.
    pub prompt: String,
}

/// Use case for relaying one prompt to the engine and recording the
/// exchange.
pub struct SendMessageUseCase {
    engine: Arc<dyn InferenceEngine>,
    chats: Arc<dyn ChatRepository>,
    users: Arc<dyn UserRepository>,
    default_username: String,
    params: StreamingParams,
}

impl SendMessageUseCase {
    pub fn new(
        engine: Arc<dyn InferenceEngine>,
        chats: Arc<dyn ChatRepository>,
        users: Arc<dyn UserRepository>,
        default_username: impl Into<String>,
        params: StreamingParams,
    ) -> Self {
        Self {
            engine,
            chats,
            users,
            default_username: default_username.into(),
            params,
        }
    }

    /// Validate the request, resolve the target chat, and persist the user
    /// message.
    pub async fn begin(&self, input: SendMessageInput) -> Result<PendingStream, SendMessageError> {
        if input.message.trim().is_empty() {
            return Err(SendMessageError::EmptyMessage);
        }

        let chat_id = match input.chat_id {
            Some(id) => self.chats.get_chat(id).await?.id,
            None => self.chats.create_chat(NEW_CHAT_TITLE).await?.id,
        };

        self.chats
            .append_message(chat_id, Message::user(input.message.clone()))
            .await?;

        let prompt = match self.users.get_by_username(&self.default_username).await? {
            Some(user) => user.aware_prompt(&input.message),
            None => input.message,
        };

        info!(chat = %chat_id, "user message persisted, starting stream");

        Ok(PendingStream { chat_id, prompt })
    }

    /// Relay the engine output for a prepared exchange, then settle
    /// persistence.
    ///
    /// Always emits a terminal frame (best-effort once the client is gone)
    /// and never leaks the engine process.
    pub async fn stream(
        &self,
        pending: PendingStream,
        relay: Arc<dyn EventRelay>,
    ) -> SessionOutcome {
        let generation = match self.engine.generate(&pending.prompt, &self.params.model).await {
            Ok(generation) => generation,
            Err(e) => {
                error!("engine launch failed: {e}");
                let _ = relay.error_marker();
                let _ = relay.terminal();
                return SessionOutcome {
                    state: SessionState::UpstreamError,
                    text: String::new(),
                    error: Some(e),
                };
            }
        };

        let session = StreamSession::new(Arc::clone(&relay), &self.params);
        let outcome = session.run(generation).await;

        if self.should_persist(&outcome) {
            let message = Message::assistant(outcome.text.clone());
            if let Err(e) = self.chats.append_message(pending.chat_id, message).await {
                // Tokens already reached the client; a failed append is
                // logged, never surfaced.
                error!(chat = %pending.chat_id, "failed to persist assistant message: {e}");
            }
        }

        let _ = relay.terminal();
        outcome
    }

    fn should_persist(&self, outcome: &SessionOutcome) -> bool {
        if outcome.text.is_empty() {
            return false;
        }
        match self.params.partial_answer {
            PartialAnswerPolicy::Persist => true,
            PartialAnswerPolicy::Discard => outcome.state == SessionState::Completed,
        }
    }
}
