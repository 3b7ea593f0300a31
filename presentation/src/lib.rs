//! Presentation layer for hearth - HTTP transport
//!
//! The axum router, request handlers, and the SSE relay that adapts the
//! application's [`EventRelay`] port onto a live HTTP response.
//!
//! [`EventRelay`]: hearth_application::ports::relay::EventRelay

pub mod http;

// Re-export commonly used types
pub use http::routes::router;
pub use http::sse::{Frame, SseRelay};
pub use http::state::AppState;
