//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP/TLS connection (axum-server)
//!     → server.rs (single catch-all dispatch)
//!     → routing::Router (Found | NotFound | MethodNotAllowed)
//!     → replay.rs (fixture → response)   or   fallback.rs (404 / 405)
//!         → raw.rs (parse captured HTTP text)
//!     → Send to client
//! ```

pub mod fallback;
pub mod raw;
pub mod replay;
pub mod server;

pub use fallback::{FallbackHandler, Fallbacks};
pub use raw::{ParseError, ParsedResponse};
pub use replay::{ReplayError, ReplayHandler};
pub use server::{MockServer, ServerError};
