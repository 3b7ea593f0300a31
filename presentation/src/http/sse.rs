//! SSE transport adapter.
//!
//! Bridges the application's [`EventRelay`] port onto an axum SSE response.
//! Frames are pushed into an unbounded channel whose receiver is drained by
//! the HTTP body stream, so every wire write is serialized through one
//! consumer — a heartbeat can never interleave with a fragment mid-frame.
//! A failed send means the body stream was dropped: the client is gone.

use async_trait::async_trait;
use axum::response::sse::Event;
use hearth_application::{ClientGone, EventRelay};
use tokio::sync::mpsc;

/// Marker text sent before the terminal frame when the upstream fails.
pub(crate) const ERROR_MARKER: &str = "[ERROR] Failed to complete response.";

/// A frame on its way to one client connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// One engine fragment.
    Fragment(String),
    /// Keep-alive (empty data frame).
    Heartbeat,
    /// Best-effort upstream-failure marker.
    ErrorMarker,
    /// `event: complete` — end of exchange.
    Terminal,
}

impl Frame {
    /// Encode per the wire framing. The encoder splits embedded newlines
    /// across `data:` lines, so a multi-line fragment cannot break out of
    /// its frame.
    pub fn into_event(self) -> Event {
        match self {
            Frame::Fragment(text) => Event::default().data(text),
            Frame::Heartbeat => Event::default().data(""),
            Frame::ErrorMarker => Event::default().data(ERROR_MARKER),
            Frame::Terminal => Event::default().event("complete").data("done"),
        }
    }
}

/// [`EventRelay`] implementation feeding one SSE response body.
pub struct SseRelay {
    tx: mpsc::UnboundedSender<Frame>,
}

impl SseRelay {
    /// Build a relay plus the receiver to drain into the response body.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Frame>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn send(&self, frame: Frame) -> Result<(), ClientGone> {
        self.tx.send(frame).map_err(|_| ClientGone)
    }
}

#[async_trait]
impl EventRelay for SseRelay {
    fn forward(&self, fragment: &str) -> Result<(), ClientGone> {
        self.send(Frame::Fragment(fragment.to_string()))
    }

    fn heartbeat(&self) -> Result<(), ClientGone> {
        self.send(Frame::Heartbeat)
    }

    fn error_marker(&self) -> Result<(), ClientGone> {
        self.send(Frame::ErrorMarker)
    }

    fn terminal(&self) -> Result<(), ClientGone> {
        self.send(Frame::Terminal)
    }

    async fn closed(&self) {
        self.tx.closed().await;
    }
}
