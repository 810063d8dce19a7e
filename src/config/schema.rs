//! Configuration schema definitions.
//!
//! A manifest lists the routes to serve and where their fixtures live.
//! All types derive Serde traits for deserialization from TOML.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration for a standalone mock server.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct MockConfig {
    /// Listener configuration (bind address, TLS).
    pub listener: ListenerConfig,

    /// Routes to register, in order.
    pub routes: Vec<RouteConfig>,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "127.0.0.1:8080"). Port 0 picks a free port.
    pub bind_address: String,

    /// Optional TLS configuration.
    pub tls: Option<TlsConfig>,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:0".to_string(),
            tls: None,
        }
    }
}

/// TLS configuration for the listener.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TlsConfig {
    /// Path to certificate file (PEM).
    pub cert_path: PathBuf,

    /// Path to private key file (PEM).
    pub key_path: PathBuf,
}

/// A route backed by a fixture file.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RouteConfig {
    /// HTTP method; empty or omitted matches every method.
    #[serde(default)]
    pub method: String,

    /// Path pattern, e.g. `/unicorns/{id}`.
    pub pattern: String,

    /// Captured response file, relative to the manifest's directory.
    pub fixture: PathBuf,
}
