//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! manifest (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → loader.rs (read fixture files → Route[])
//!     → MockServer
//! ```
//!
//! # Design Decisions
//! - Used by the standalone binary; tests usually build routes directly
//! - All listener fields have defaults to allow minimal manifests
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_manifest, load_routes, parse_config, ConfigError};
pub use schema::{ListenerConfig, MockConfig, RouteConfig, TlsConfig};
pub use validation::ValidationError;
