//! Configuration and fixture loading from disk.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::schema::MockConfig;
use crate::config::validation::{validate_config, ValidationError};
use crate::routing::Route;

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),

    #[error("Failed to read fixture {path:?}: {source}")]
    Fixture {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<MockConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<MockConfig, ConfigError> {
    let config: MockConfig = toml::from_str(content)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Read every fixture named by `config`, resolving relative paths against `base_dir`.
pub fn load_routes(config: &MockConfig, base_dir: &Path) -> Result<Vec<Route>, ConfigError> {
    config
        .routes
        .iter()
        .map(|rc| {
            let path = base_dir.join(&rc.fixture);
            let bytes = fs::read(&path).map_err(|source| ConfigError::Fixture {
                path: path.clone(),
                source,
            })?;
            tracing::debug!(
                method = %rc.method,
                pattern = %rc.pattern,
                fixture = ?path,
                bytes = bytes.len(),
                "Fixture loaded"
            );
            Ok(Route::new(rc.method.clone(), rc.pattern.clone(), bytes))
        })
        .collect()
}

/// Load a manifest and its fixtures in one go.
pub fn load_manifest(path: &Path) -> Result<(MockConfig, Vec<Route>), ConfigError> {
    let config = load_config(path)?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let routes = load_routes(&config, base_dir)?;
    Ok((config, routes))
}
