//! # Sift Filters
//!
//! Composable predicates for routing messaging-bot updates.
//!
//! - **Core** ([`filter`]): the [`Filter`] trait, the closure-backed
//!   [`FilterFn`], and the [`always`]/[`never`] constants
//! - **Text** ([`text`]): exact, set, prefix, suffix and regex matching over
//!   the extracted update text
//! - **Sender** ([`sender`]): [`whitelist`] and [`blacklist`] by user id
//! - **Logic** ([`logic`]): [`and`], [`or`], [`not`], plus `&`, `|` and `!`
//!   on [`FilterFn`]
//! - **Commands** ([`command`]): `/name[@bot] args` matching and parsing
//! - **Tower** ([`service`], `tower` feature): gate tower services with a
//!   filter
//!
//! Filters are pure: they never fail, never mutate state, and can be shared
//! across threads. A missing text or sender simply does not match.

pub mod command;
pub mod error;
pub mod filter;
pub mod logic;
pub mod sender;
pub mod text;

#[cfg(feature = "tower")]
pub mod service;

pub use command::{ParsedCommand, command, commands, parse_command};
pub use error::{UpdateSkipped, is_skipped};
pub use filter::{CheckFn, Filter, FilterExt, FilterFn, always, never};
pub use logic::{and, not, or};
pub use sender::{blacklist, whitelist};
pub use text::{regex, text, texts, with_prefix, with_suffix};

pub use ::regex::Regex;

#[cfg(feature = "tower")]
pub use service::{FilterServiceBuilder, ServiceBuilderExt, UpdatePredicate, on};
