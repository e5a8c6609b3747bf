//! Configuration schema definitions.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SiftConfig {
    /// Username of the bot, used by command rules to accept `/cmd@username`.
    #[serde(default)]
    pub bot_username: String,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Named rules, in evaluation order.
    #[serde(default)]
    pub rules: Vec<RuleConfig>,
}

// ============================================================================
// Logging
// ============================================================================

/// Log verbosity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Returns the level as used in filter directives.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    /// Converts to the `tracing` level.
    pub fn to_tracing_level(self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Log line format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Full,
    Pretty,
    /// Requires the `json-log` feature; falls back to `full` without it.
    Json,
}

/// Where log lines go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    #[default]
    Stdout,
    Stderr,
    /// Requires `file_path`.
    File,
}

/// Logging configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Global log level. `RUST_LOG` takes precedence when set.
    #[serde(default)]
    pub level: LogLevel,

    #[serde(default)]
    pub format: LogFormat,

    #[serde(default)]
    pub output: LogOutput,

    /// Log file for `output = "file"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<PathBuf>,

    /// Per-module levels, e.g. `sift_filters = "trace"`.
    #[serde(default)]
    pub filters: HashMap<String, LogLevel>,

    /// Include thread ids in log lines.
    #[serde(default)]
    pub thread_ids: bool,

    /// Include file names and line numbers in log lines.
    #[serde(default)]
    pub file_location: bool,
}

// ============================================================================
// Rules
// ============================================================================

/// A named rule.
///
/// ```toml
/// [[rules]]
/// name = "start"
/// kind = "command"
/// names = ["start"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Unique rule name.
    pub name: String,

    /// What the rule matches.
    #[serde(flatten)]
    pub kind: RuleKind,
}

/// The filter a rule builds.
///
/// `all`, `any` and `not` refer to rules defined earlier in the list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RuleKind {
    Always,
    Never,
    Text {
        text: String,
    },
    Texts {
        texts: Vec<String>,
    },
    Prefix {
        prefix: String,
    },
    Suffix {
        suffix: String,
    },
    Regex {
        pattern: String,
    },
    Whitelist {
        ids: Vec<i64>,
    },
    Blacklist {
        ids: Vec<i64>,
    },
    Command {
        names: Vec<String>,
        #[serde(default = "default_command_prefix")]
        prefix: String,
        /// Overrides the global `bot_username`.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        bot_username: Option<String>,
    },
    All {
        rules: Vec<String>,
    },
    Any {
        rules: Vec<String>,
    },
    Not {
        rule: String,
    },
}

impl RuleKind {
    /// Returns the `kind` tag of this rule.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Always => "always",
            Self::Never => "never",
            Self::Text { .. } => "text",
            Self::Texts { .. } => "texts",
            Self::Prefix { .. } => "prefix",
            Self::Suffix { .. } => "suffix",
            Self::Regex { .. } => "regex",
            Self::Whitelist { .. } => "whitelist",
            Self::Blacklist { .. } => "blacklist",
            Self::Command { .. } => "command",
            Self::All { .. } => "all",
            Self::Any { .. } => "any",
            Self::Not { .. } => "not",
        }
    }

    /// Names of the rules this rule refers to.
    pub fn references(&self) -> &[String] {
        match self {
            Self::All { rules } | Self::Any { rules } => rules,
            Self::Not { rule } => std::slice::from_ref(rule),
            _ => &[],
        }
    }
}

fn default_command_prefix() -> String {
    "/".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rule_deserialize() {
        let rule: RuleConfig = serde_json::from_value(json!({
            "name": "start",
            "kind": "command",
            "names": ["start"]
        }))
        .unwrap();

        assert_eq!(rule.name, "start");
        assert_eq!(
            rule.kind,
            RuleKind::Command {
                names: vec!["start".into()],
                prefix: "/".into(),
                bot_username: None,
            }
        );
    }

    #[test]
    fn test_rule_unknown_kind() {
        let result: Result<RuleConfig, _> = serde_json::from_value(json!({
            "name": "x",
            "kind": "sentiment"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_references() {
        let not = RuleKind::Not { rule: "a".into() };
        let all = RuleKind::All {
            rules: vec!["a".into(), "b".into()],
        };
        assert_eq!(not.references(), ["a".to_string()]);
        assert_eq!(all.references().len(), 2);
        assert!(RuleKind::Always.references().is_empty());
    }

    #[test]
    fn test_log_level_default() {
        let config: LoggingConfig = serde_json::from_value(json!({})).unwrap();
        assert_eq!(config.level, LogLevel::Info);
        assert_eq!(config.level.to_string(), "info");
    }
}
