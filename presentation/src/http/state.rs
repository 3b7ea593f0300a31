//! Shared handler state.

use hearth_application::{ManageChatsUseCase, ManageUserUseCase, SendMessageUseCase};
use std::sync::Arc;

/// The wired use cases handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub send_message: Arc<SendMessageUseCase>,
    pub chats: Arc<ManageChatsUseCase>,
    pub users: Arc<ManageUserUseCase>,
}
