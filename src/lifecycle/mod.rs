//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! state.rs:
//!     Unstarted → Running → Closed
//!
//! signals.rs (binary only):
//!     SIGINT → close the server → exit
//! ```
//!
//! # Design Decisions
//! - Close is terminal and idempotent
//! - Dropping a server closes it

pub mod signals;
pub mod state;

pub use state::{ServerState, TransitionError};
