//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check methods, patterns and the bind address
//! - Detect routes registered twice
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is a pure function: MockConfig → Result<(), Vec<ValidationError>>
//! - Fixture contents are not checked; they are parsed per request

use std::collections::HashSet;
use std::net::SocketAddr;

use crate::config::schema::MockConfig;
use crate::routing::{MethodFilter, Pattern};

/// A single semantic problem in a manifest.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("no routes configured")]
    NoRoutes,

    #[error("invalid bind address {0:?}")]
    BindAddress(String),

    #[error("route #{index}: unsupported method {method:?}")]
    Method { index: usize, method: String },

    #[error("route #{index}: {reason}")]
    Pattern { index: usize, reason: String },

    #[error("route #{index}: {method} {pattern} is already registered")]
    Duplicate {
        index: usize,
        method: String,
        pattern: String,
    },
}

/// Validate a manifest, collecting every problem.
pub fn validate_config(config: &MockConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }

    if config.routes.is_empty() {
        errors.push(ValidationError::NoRoutes);
    }

    let mut seen = HashSet::new();
    for (index, route) in config.routes.iter().enumerate() {
        let method = match MethodFilter::parse(&route.method) {
            Ok(m) => m,
            Err(_) => {
                errors.push(ValidationError::Method {
                    index,
                    method: route.method.clone(),
                });
                continue;
            }
        };

        if let Err(e) = Pattern::compile(&route.pattern) {
            errors.push(ValidationError::Pattern {
                index,
                reason: e.to_string(),
            });
            continue;
        }

        let key = (route.method.trim().to_ascii_uppercase(), route.pattern.clone());
        if !seen.insert(key) {
            let method = match method {
                MethodFilter::Any => "*".to_string(),
                MethodFilter::Only(m) => m.to_string(),
            };
            errors.push(ValidationError::Duplicate {
                index,
                method,
                pattern: route.pattern.clone(),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
