//! Decorator configuration
//!
//! Loaded from TOML. Every section and key is optional:
//! ```toml
//! [decorations]
//! enabled = true
//! decorate_ancestors = true
//!
//! [logging]
//! level = "info"
//! ```

use crate::error::ConfigError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoratorConfig {
    pub decorations: DecorationsConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecorationsConfig {
    /// Master switch; when off, updates carry empty mappings
    pub enabled: bool,
    /// When off, only the reported paths themselves are decorated
    pub decorate_ancestors: bool,
}

impl Default for DecorationsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            decorate_ancestors: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter level; `RUST_LOG` takes precedence
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl DecoratorConfig {
    /// Parse and validate TOML text
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file; a missing file yields the defaults
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml_str(&text)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let level = self.logging.level.to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::InvalidLevel(self.logging.level.clone()));
        }
        Ok(())
    }
}

/// Commented example configuration with every key at its default
pub fn example_config() -> &'static str {
    r#"# Decorator configuration

[decorations]
# Master switch; when false, decoration updates carry empty mappings
enabled = true
# When false, only changed paths are decorated, not their parent directories
decorate_ancestors = true

[logging]
# trace | debug | info | warn | error (RUST_LOG overrides)
level = "info"
"#
}
