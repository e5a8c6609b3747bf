//! # Sift Runtime
//!
//! Everything around the filters that an application needs to run them from
//! configuration:
//!
//! - **Config** ([`config`]): figment-based loading of `sift.toml`, `SIFT_*`
//!   environment variables and programmatic overrides, plus validation
//! - **Rules** ([`rules`]): compiles `[[rules]]` entries into named filters
//! - **Logging** ([`logging`]): `tracing-subscriber` setup driven by the
//!   `[logging]` section
//!
//! ## Example
//!
//! ```rust,ignore
//! use sift_runtime::{RuleSet, config::load_config, logging};
//!
//! let config = load_config()?;
//! logging::init_from_config(&config.logging);
//!
//! let rules = RuleSet::build(&config)?;
//! if let Some(name) = rules.first_match(&update) {
//!     tracing::info!(rule = name, "Routing update");
//! }
//! ```

pub mod config;
pub mod logging;
pub mod rules;

pub use config::{ConfigError, ConfigLoader, ConfigResult, SiftConfig};
pub use logging::{LoggingBuilder, init_from_config};
pub use rules::{NamedRule, RuleSet};
