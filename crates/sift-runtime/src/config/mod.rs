//! Configuration module for the sift runtime.
//!
//! Figment-based loading (files, `SIFT_*` environment variables, programmatic
//! overrides) and validation of the bot username, logging settings and rules.

pub mod error;
pub mod loader;
pub mod schema;
pub mod validation;

pub use error::{ConfigError, ConfigResult};
pub use loader::{ConfigLoader, Profile, load_config, load_config_from_file};
pub use schema::{
    LogFormat, LogLevel, LogOutput, LoggingConfig, RuleConfig, RuleKind, SiftConfig,
};
pub use validation::validate_config;
