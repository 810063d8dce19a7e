//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! MockServer::start / start_tls
//!     → std TcpListener bound on loopback (port chosen by the OS)
//!     → tls.rs (optional RustlsConfig)
//!     → axum-server accept loop, one task per connection
//! ```
//!
//! # Design Decisions
//! - The listener is bound synchronously so the URL is known as soon as start returns
//! - TLS is optional and handled transparently by axum-server

pub mod tls;

pub use tls::{load_tls_config, tls_config_from_pem, TlsError};
