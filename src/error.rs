//! Error types
//!
//! Simulations never fail; errors only come from loading tuning files and from
//! hosts attaching to a page.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config value `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid { field, reason: reason.into() }
    }
}

/// Why a host could not start an effect. Hosts log these and leave the page
/// untouched; a missing animation is never fatal.
#[derive(Debug, Error)]
pub enum MountError {
    #[error("no window or document available")]
    NoWindow,
    #[error("element `{0}` not found")]
    NotFound(String),
    #[error("element `{0}` is not a canvas")]
    NotCanvas(String),
    #[error("2d context unavailable on `{0}`")]
    NoContext(String),
    #[error("unknown effect `{0}` (expected field, network or grid)")]
    UnknownEffect(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("browser call failed: {0}")]
    Js(String),
}
