//! Server lifecycle state machine.
//!
//! ```text
//! Unstarted ──start──▶ Running ──close──▶ Closed
//!     │                                     ▲
//!     └────────────────close────────────────┘
//! ```

/// Lifecycle state of a mock server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ServerState {
    /// Routes registered, handlers configurable, nothing listening.
    #[default]
    Unstarted,
    /// Listener bound and serving.
    Running,
    /// Terminal; the listener has been released.
    Closed,
}

/// Error type for invalid lifecycle transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("server already started")]
    AlreadyStarted,
    #[error("server is closed")]
    Closed,
}

impl ServerState {
    /// Move to `Running`.
    pub fn start(&mut self) -> Result<(), TransitionError> {
        self.ensure_unstarted()?;
        *self = ServerState::Running;
        Ok(())
    }

    /// Fail unless still `Unstarted`.
    pub fn ensure_unstarted(&self) -> Result<(), TransitionError> {
        match self {
            ServerState::Unstarted => Ok(()),
            ServerState::Running => Err(TransitionError::AlreadyStarted),
            ServerState::Closed => Err(TransitionError::Closed),
        }
    }

    /// Move to `Closed`. Returns true if the server was running.
    pub fn close(&mut self) -> bool {
        let was_running = *self == ServerState::Running;
        *self = ServerState::Closed;
        was_running
    }

    pub fn is_running(&self) -> bool {
        *self == ServerState::Running
    }
}

impl std::fmt::Display for ServerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ServerState::Unstarted => "unstarted",
            ServerState::Running => "running",
            ServerState::Closed => "closed",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn happy_path() {
        let mut state = ServerState::default();
        assert_eq!(state, ServerState::Unstarted);

        state.start().unwrap();
        assert!(state.is_running());

        assert!(state.close());
        assert_eq!(state, ServerState::Closed);
    }

    #[test]
    fn start_twice_fails() {
        let mut state = ServerState::Unstarted;
        state.start().unwrap();
        assert_eq!(state.start(), Err(TransitionError::AlreadyStarted));
    }

    #[test]
    fn close_is_idempotent_and_terminal() {
        let mut state = ServerState::Unstarted;
        assert!(!state.close());
        assert!(!state.close());
        assert_eq!(state.start(), Err(TransitionError::Closed));
        assert_eq!(state.to_string(), "closed");
    }
}
