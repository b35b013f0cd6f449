//! Decor - source-control status decorations for file trees
//!
//! Ties the pieces together:
//! - [`ChangeDecorator`] follows the selected repository and publishes
//!   decoration updates for every change snapshot
//! - [`DecoratorConfig`] loads the TOML configuration
//! - [`logging::init`] installs the tracing subscriber

pub mod config;
pub mod controller;
pub mod error;
pub mod logging;

pub use config::{example_config, DecorationsConfig, DecoratorConfig, LoggingConfig};
pub use controller::{ChangeDecorator, DecorationProvider, DecorationUpdate};
pub use error::{ConfigError, DecoratorError};
