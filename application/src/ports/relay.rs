//! Event relay port — the outbound wire to one client connection.

use async_trait::async_trait;
use thiserror::Error;

/// The client connection is gone; nothing further can be delivered.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("client connection closed")]
pub struct ClientGone;

/// Transport adapter writing stream frames to a single client connection.
///
/// Every frame of a session passes through one relay, which serializes
/// wire writes: a heartbeat can never interleave with a fragment mid-frame.
/// A write failure means the client disconnected, not that the upstream
/// failed.
#[async_trait]
pub trait EventRelay: Send + Sync {
    /// Forward one text fragment to the client.
    fn forward(&self, fragment: &str) -> Result<(), ClientGone>;

    /// Emit an empty keep-alive frame.
    fn heartbeat(&self) -> Result<(), ClientGone>;

    /// Emit the best-effort upstream-failure marker.
    fn error_marker(&self) -> Result<(), ClientGone>;

    /// Emit the terminal frame closing the exchange.
    fn terminal(&self) -> Result<(), ClientGone>;

    /// Resolves once the client connection has been torn down.
    async fn closed(&self);
}
