//! Error types for the decoration controller

use decor_watcher::WatchError;
use thiserror::Error;

/// Failure while handling a repository selection
#[derive(Debug, Error)]
pub enum DecoratorError {
    /// The change source could not watch the selected repository
    #[error(transparent)]
    Watch(#[from] WatchError),

    #[error("Decorator has been disposed")]
    Disposed,
}

/// Invalid or unreadable configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid logging level '{0}' (expected trace, debug, info, warn or error)")]
    InvalidLevel(String),
}
