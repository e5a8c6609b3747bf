//! # Sift
//!
//! Composable predicate filters for routing messaging-bot updates.
//!
//! ## Overview
//!
//! A filter answers one question about an incoming update: does it match?
//! Filters look at the update's text (message text, caption, callback data or
//! inline query) and at its sender id, and compose with `&`, `|` and `!`.
//!
//! ```text
//! ┌──────────┐     ┌───────────────────────────┐
//! │  Update  │────▶│ text / sender extraction  │──▶ leaf filters ──▶ and / or / not ──▶ bool
//! └──────────┘     └───────────────────────────┘
//! ```
//!
//! - **Core**: the update model and extraction helpers
//! - **Filters**: leaf filters, combinators, command matching, tower gating
//! - **Runtime**: configuration, declarative rules and logging
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use sift::prelude::*;
//!
//! let admin_start = command("start", "mybot") & whitelist([42]);
//! let spam = regex(Regex::new(r"(?i)free money")?) | blacklist([42]).negate();
//!
//! let update = Update::from_json(line)?;
//! if admin_start.check(&update) {
//!     // ...
//! }
//! ```
//!
//! ## Features
//!
//! - `toml-config` *(default)*: TOML configuration files
//! - `yaml-config`: YAML configuration files
//! - `json-log`: JSON log output

pub use sift_core as core;
pub use sift_filters as filters;
pub use sift_runtime as runtime;

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use sift::prelude::*;
/// ```
pub mod prelude {
    // Update model
    pub use sift_core::{Message, Update, UpdateKind, User, extract_sender_id, extract_update_text};

    // Filters and combinators
    pub use sift_filters::{
        Filter, FilterExt, FilterFn, Regex, always, and, blacklist, command, commands, never, not,
        or, parse_command, regex, text, texts, whitelist, with_prefix, with_suffix,
    };

    // Tower integration
    pub use sift_filters::{ServiceBuilderExt, UpdateSkipped, on};

    // Declarative rules
    pub use sift_runtime::{ConfigLoader, RuleSet, SiftConfig};
}
