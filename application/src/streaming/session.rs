//! The per-request stream session.
//!
//! Coordinates one engine generation against one client connection:
//! fragments are forwarded and accumulated in lockstep, a heartbeat keeps
//! the connection alive while tokens are scarce, and a disconnect watcher
//! ends the exchange when the client goes away. All three activities
//! observe one [`CompletionSignal`]; whichever detects termination first
//! closes it, and the others stand down.

use crate::config::StreamingParams;
use crate::ports::engine::{EngineError, Generation};
use crate::ports::relay::EventRelay;
use crate::streaming::signal::CompletionSignal;
use hearth_domain::SessionState;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

/// How one streaming exchange ended.
#[derive(Debug)]
pub struct SessionOutcome {
    /// Terminal state the session reached before closing.
    pub state: SessionState,
    /// Concatenation of every fragment successfully forwarded, in order.
    pub text: String,
    /// The upstream failure, when `state` is `UpstreamError`.
    pub error: Option<EngineError>,
}

/// Coordination unit for one streaming exchange.
///
/// Owns the completion signal and the heartbeat/watcher tasks for the
/// lifetime of [`run`](Self::run). The engine process is reaped on every
/// exit path — normal completion, upstream failure, and client disconnect.
pub struct StreamSession {
    relay: Arc<dyn EventRelay>,
    signal: CompletionSignal,
    heartbeat_interval: Duration,
    idle_timeout: Option<Duration>,
    state: SessionState,
}

impl StreamSession {
    pub fn new(relay: Arc<dyn EventRelay>, params: &StreamingParams) -> Self {
        Self {
            relay,
            signal: CompletionSignal::new(),
            heartbeat_interval: params.heartbeat_interval,
            idle_timeout: params.idle_timeout,
            state: SessionState::Init,
        }
    }

    /// The signal observed by this session's activities.
    pub fn signal(&self) -> &CompletionSignal {
        &self.signal
    }

    /// Drive `generation` to a terminal state.
    ///
    /// On return the heartbeat task has been joined (nothing can write
    /// after the caller's terminal frame), the engine process has been
    /// reaped, and on upstream failure the error marker has been offered
    /// to the client. The caller owns persistence and the terminal frame.
    pub async fn run(mut self, mut generation: Box<dyn Generation>) -> SessionOutcome {
        self.state = SessionState::Streaming;

        let heartbeat = tokio::spawn(heartbeat_loop(
            Arc::clone(&self.relay),
            self.signal.clone(),
            self.heartbeat_interval,
        ));
        let watcher = tokio::spawn(watch_disconnect(
            Arc::clone(&self.relay),
            self.signal.clone(),
        ));

        let mut accumulated = String::new();
        let mut upstream_error = None;

        let mut terminal = loop {
            tokio::select! {
                _ = self.signal.cancelled() => {
                    break SessionState::Disconnected;
                }
                next = next_fragment(generation.as_mut(), self.idle_timeout) => match next {
                    Ok(Some(fragment)) => {
                        if self.relay.forward(&fragment).is_err() {
                            if self.signal.close() {
                                debug!("fragment write failed, client gone");
                            }
                            break SessionState::Disconnected;
                        }
                        accumulated.push_str(&fragment);
                    }
                    Ok(None) => break SessionState::Completed,
                    Err(e) => {
                        upstream_error = Some(e);
                        break SessionState::UpstreamError;
                    }
                }
            }
        };

        // Close (idempotently) and join both activities, so exactly one
        // shutdown happens and no heartbeat can follow this point.
        self.signal.close();
        let _ = watcher.await;
        let _ = heartbeat.await;

        // Reap the engine process on every path.
        if terminal == SessionState::Disconnected {
            generation.abort().await;
        } else if let Err(e) = generation.wait().await {
            warn!("engine exited abnormally: {e}");
            if terminal == SessionState::Completed {
                terminal = SessionState::UpstreamError;
            }
            upstream_error.get_or_insert(e);
        }

        if terminal == SessionState::UpstreamError {
            // Best-effort: skipped silently if the client is already gone.
            let _ = self.relay.error_marker();
        }

        debug_assert!(self.state.can_transition_to(terminal));
        self.state = SessionState::Closed;

        SessionOutcome {
            state: terminal,
            text: accumulated,
            error: upstream_error,
        }
    }
}

/// Wrap the next read in the configured idle timeout, surfacing a stall as
/// a read error.
async fn next_fragment(
    generation: &mut dyn Generation,
    idle_timeout: Option<Duration>,
) -> Result<Option<String>, EngineError> {
    match idle_timeout {
        Some(limit) => match tokio::time::timeout(limit, generation.next_fragment()).await {
            Ok(result) => result,
            Err(_) => Err(EngineError::Read(format!(
                "no engine output for {}s",
                limit.as_secs()
            ))),
        },
        None => generation.next_fragment().await,
    }
}

/// Emit keep-alive frames on a fixed interval until the signal closes.
///
/// A write failure here is sufficient evidence of client disconnection and
/// triggers the same terminal transition as the disconnect watcher.
async fn heartbeat_loop(
    relay: Arc<dyn EventRelay>,
    signal: CompletionSignal,
    period: Duration,
) {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick resolves immediately; consume it so heartbeats start
    // one period in.
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = signal.cancelled() => return,
            _ = ticker.tick() => {
                if relay.heartbeat().is_err() {
                    if signal.close() {
                        debug!("heartbeat write failed, client gone");
                    }
                    return;
                }
            }
        }
    }
}

/// Close the signal when the client connection is torn down.
async fn watch_disconnect(relay: Arc<dyn EventRelay>, signal: CompletionSignal) {
    tokio::select! {
        _ = signal.cancelled() => {}
        _ = relay.closed() => {
            if signal.close() {
                debug!("client disconnected, stopping stream");
            }
        }
    }
}
