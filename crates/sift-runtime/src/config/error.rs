//! Errors raised while loading configuration and compiling rules.

use std::path::PathBuf;
use thiserror::Error;

/// Everything that can go wrong between reading `sift.toml` and holding a
/// compiled [`RuleSet`](crate::RuleSet).
#[derive(Error, Debug)]
pub enum ConfigError {
    /// An explicitly requested file does not exist.
    #[error("No configuration file at {}", .0.display())]
    FileNotFound(PathBuf),

    /// The configuration could not be parsed or extracted.
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// A value is present but unusable.
    #[error("Invalid configuration value: {message}")]
    ValidationError { message: String },

    /// A value that must be set is empty.
    #[error("Configuration field `{field}` must not be empty")]
    MissingField { field: String },

    /// Two rules share a name.
    #[error("Duplicate rule name: {0}")]
    DuplicateRule(String),

    /// A rule refers to a rule that is not defined before it.
    #[error("Rule '{rule}' references unknown rule '{reference}'")]
    UnknownRule { rule: String, reference: String },

    /// A regex rule does not compile.
    #[error("Rule '{rule}' has an invalid pattern: {source}")]
    InvalidPattern {
        rule: String,
        #[source]
        source: regex::Error,
    },
}

impl ConfigError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
        }
    }

    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    pub fn unknown_rule(rule: impl Into<String>, reference: impl Into<String>) -> Self {
        Self::UnknownRule {
            rule: rule.into(),
            reference: reference.into(),
        }
    }
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::ParseError(err.to_string())
    }
}

/// `Result` alias for this module.
pub type ConfigResult<T> = Result<T, ConfigError>;
