//! Per-request streaming coordination.
//!
//! [`StreamSession`] multiplexes three independently timed activities —
//! fragment forwarding, a fixed-interval heartbeat, and a client-disconnect
//! watcher — around a single [`CompletionSignal`].

mod session;
mod signal;

pub use session::{SessionOutcome, StreamSession};
pub use signal::CompletionSignal;
