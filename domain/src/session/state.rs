//! Stream session state machine.

/// Lifecycle of one streaming exchange.
///
/// `Init → Streaming → {Completed | Disconnected | UpstreamError} → Closed`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Session created, nothing relayed yet.
    Init,
    /// Fragments are being relayed to the client.
    Streaming,
    /// Engine output ended normally.
    Completed,
    /// The client connection went away.
    Disconnected,
    /// The engine failed to launch, read, or exit cleanly.
    UpstreamError,
    /// Signal closed, heartbeat stopped, engine process reaped.
    Closed,
}

impl SessionState {
    /// The three states that end streaming.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Completed | Self::Disconnected | Self::UpstreamError
        )
    }

    /// Whether the state machine permits moving from `self` to `next`.
    pub fn can_transition_to(&self, next: SessionState) -> bool {
        use SessionState::*;
        matches!(
            (self, next),
            (Init, Streaming)
                | (Streaming, Completed)
                | (Streaming, Disconnected)
                | (Streaming, UpstreamError)
                | (Completed, Closed)
                | (Disconnected, Closed)
                | (UpstreamError, Closed)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_states() {
        assert!(SessionState::Completed.is_terminal());
        assert!(SessionState::Disconnected.is_terminal());
        assert!(SessionState::UpstreamError.is_terminal());
        assert!(!SessionState::Init.is_terminal());
        assert!(!SessionState::Streaming.is_terminal());
        assert!(!SessionState::Closed.is_terminal());
    }

    #[test]
    fn valid_transitions() {
        assert!(SessionState::Init.can_transition_to(SessionState::Streaming));
        assert!(SessionState::Streaming.can_transition_to(SessionState::Completed));
        assert!(SessionState::Streaming.can_transition_to(SessionState::Disconnected));
        assert!(SessionState::Streaming.can_transition_to(SessionState::UpstreamError));
        assert!(SessionState::Disconnected.can_transition_to(SessionState::Closed));
    }

    #[test]
    fn invalid_transitions() {
        assert!(!SessionState::Init.can_transition_to(SessionState::Completed));
        assert!(!SessionState::Closed.can_transition_to(SessionState::Streaming));
        assert!(!SessionState::Completed.can_transition_to(SessionState::Disconnected));
    }
}
