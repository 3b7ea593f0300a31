//! Stream session lifecycle.

mod state;

pub use state::SessionState;
