//! Configuration validation utilities.
//!
//! These checks are structural. Reference resolution and pattern compilation
//! happen when the rules are built, see [`RuleSet::build`](crate::RuleSet::build).

use std::collections::HashSet;

use super::error::{ConfigError, ConfigResult};
use super::schema::{RuleConfig, RuleKind, SiftConfig};

/// Validates the entire configuration.
pub fn validate_config(config: &SiftConfig) -> ConfigResult<()> {
    validate_username(&config.bot_username)?;
    validate_rules(&config.rules)?;
    Ok(())
}

/// Validates a bot username.
fn validate_username(username: &str) -> ConfigResult<()> {
    if username.chars().any(char::is_whitespace) {
        return Err(ConfigError::validation(format!(
            "Bot username cannot contain whitespace: {username:?}"
        )));
    }
    Ok(())
}

/// Validates all rules.
fn validate_rules(rules: &[RuleConfig]) -> ConfigResult<()> {
    let mut seen = HashSet::new();

    for rule in rules {
        if !seen.insert(rule.name.as_str()) {
            return Err(ConfigError::DuplicateRule(rule.name.clone()));
        }

        validate_rule(rule)?;
    }

    Ok(())
}

/// Validates a single rule.
fn validate_rule(rule: &RuleConfig) -> ConfigResult<()> {
    if rule.name.is_empty() {
        return Err(ConfigError::missing_field("rules.name"));
    }

    if rule.name.contains(' ') {
        return Err(ConfigError::validation(format!(
            "Rule name cannot contain spaces: {:?}",
            rule.name
        )));
    }

    match &rule.kind {
        RuleKind::Command {
            names,
            prefix,
            bot_username,
        } => {
            if names.is_empty() {
                return Err(ConfigError::missing_field(format!(
                    "rules.{}.names",
                    rule.name
                )));
            }
            if names.iter().any(|name| name.is_empty() || name.contains(' ')) {
                return Err(ConfigError::validation(format!(
                    "Rule '{}' has an empty command name or one containing spaces",
                    rule.name
                )));
            }
            if prefix.contains(' ') {
                return Err(ConfigError::validation(format!(
                    "Rule '{}' has a command prefix containing spaces",
                    rule.name
                )));
            }
            if let Some(username) = bot_username {
                validate_username(username)?;
            }
        }
        RuleKind::Prefix { prefix } if prefix.is_empty() => {
            return Err(ConfigError::validation(format!(
                "Rule '{}' has an empty prefix and would match everything",
                rule.name
            )));
        }
        RuleKind::Suffix { suffix } if suffix.is_empty() => {
            return Err(ConfigError::validation(format!(
                "Rule '{}' has an empty suffix and would match everything",
                rule.name
            )));
        }
        _ => {}
    }

    if rule.kind.references().iter().any(|r| *r == rule.name) {
        return Err(ConfigError::validation(format!(
            "Rule '{}' refers to itself",
            rule.name
        )));
    }

    Ok(())
}
