//! Declarative rules.
//!
//! A [`RuleSet`] compiles the `[[rules]]` section of the configuration into
//! named filters. Composite rules (`all`, `any`, `not`) refer to rules defined
//! earlier in the list, which keeps the graph acyclic by construction.
//!
//! ```rust,ignore
//! use sift_runtime::{RuleSet, config::load_config};
//!
//! let config = load_config()?;
//! let rules = RuleSet::build(&config)?;
//!
//! for name in rules.matching(&update) {
//!     println!("matched {name}");
//! }
//! ```

use std::collections::HashMap;

use regex::Regex;
use sift_core::Update;
use sift_filters::{
    Filter, FilterFn, always, and, blacklist, commands, never, not, or, regex, text, texts,
    whitelist, with_prefix, with_suffix,
};
use tracing::{debug, trace};

use crate::config::{ConfigError, ConfigResult, RuleConfig, RuleKind, SiftConfig};

/// A filter together with the name it was configured under.
#[derive(Debug, Clone)]
pub struct NamedRule {
    name: String,
    filter: FilterFn,
}

impl NamedRule {
    /// Returns the rule name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the compiled filter.
    pub fn filter(&self) -> &FilterFn {
        &self.filter
    }
}

/// Named filters compiled from configuration, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<NamedRule>,
}

impl RuleSet {
    /// Compiles the rules of `config`.
    pub fn build(config: &SiftConfig) -> ConfigResult<Self> {
        Self::from_rules(&config.rules, &config.bot_username)
    }

    /// Compiles `rules`, using `bot_username` for command rules that do not
    /// set their own.
    pub fn from_rules(rules: &[RuleConfig], bot_username: &str) -> ConfigResult<Self> {
        let mut built: HashMap<&str, FilterFn> = HashMap::with_capacity(rules.len());
        let mut compiled = Vec::with_capacity(rules.len());

        for rule in rules {
            if built.contains_key(rule.name.as_str()) {
                return Err(ConfigError::DuplicateRule(rule.name.clone()));
            }

            let filter = build_rule(rule, &built, bot_username)?.name(rule.name.clone());
            debug!(rule = %rule.name, kind = rule.kind.as_str(), "Compiled rule");

            built.insert(rule.name.as_str(), filter.clone());
            compiled.push(NamedRule {
                name: rule.name.clone(),
                filter,
            });
        }

        Ok(Self { rules: compiled })
    }

    /// Returns the filter registered under `name`.
    pub fn get(&self, name: &str) -> Option<&FilterFn> {
        self.rules
            .iter()
            .find(|rule| rule.name == name)
            .map(|rule| &rule.filter)
    }

    /// Iterates over all rules in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &NamedRule> {
        self.rules.iter()
    }

    /// Names of the rules `update` passes, in declaration order.
    ///
    /// The names borrow from the rule set only, so `update` may be dropped
    /// before they are.
    pub fn matching<'a, 'u>(
        &'a self,
        update: &'u Update,
    ) -> impl Iterator<Item = &'a str> + use<'a, 'u> {
        self.rules
            .iter()
            .filter(move |rule| {
                let matched = rule.filter.check(update);
                trace!(
                    rule = %rule.name,
                    update_id = update.update_id,
                    matched,
                    "Evaluated rule"
                );
                matched
            })
            .map(|rule| rule.name.as_str())
    }

    /// Name of the first rule `update` passes.
    pub fn first_match(&self, update: &Update) -> Option<&str> {
        self.rules
            .iter()
            .find(|rule| rule.filter.check(update))
            .map(|rule| rule.name.as_str())
    }

    /// Returns the number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns `true` if there are no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

fn resolve(
    rule: &RuleConfig,
    reference: &str,
    built: &HashMap<&str, FilterFn>,
) -> ConfigResult<FilterFn> {
    built
        .get(reference)
        .cloned()
        .ok_or_else(|| ConfigError::unknown_rule(&rule.name, reference))
}

fn resolve_all(
    rule: &RuleConfig,
    references: &[String],
    built: &HashMap<&str, FilterFn>,
) -> ConfigResult<Vec<FilterFn>> {
    references
        .iter()
        .map(|reference| resolve(rule, reference, built))
        .collect()
}

fn build_rule(
    rule: &RuleConfig,
    built: &HashMap<&str, FilterFn>,
    bot_username: &str,
) -> ConfigResult<FilterFn> {
    let filter = match &rule.kind {
        RuleKind::Always => always(),
        RuleKind::Never => never(),
        RuleKind::Text { text: literal } => text(literal.as_str()),
        RuleKind::Texts { texts: literals } => texts(literals.iter().cloned()),
        RuleKind::Prefix { prefix } => with_prefix(prefix.as_str()),
        RuleKind::Suffix { suffix } => with_suffix(suffix.as_str()),
        RuleKind::Regex { pattern } => {
            let pattern = Regex::new(pattern).map_err(|source| ConfigError::InvalidPattern {
                rule: rule.name.clone(),
                source,
            })?;
            regex(pattern)
        }
        RuleKind::Whitelist { ids } => whitelist(ids.iter().copied()),
        RuleKind::Blacklist { ids } => blacklist(ids.iter().copied()),
        RuleKind::Command {
            names,
            prefix,
            bot_username: own_username,
        } => commands(
            prefix,
            own_username.as_deref().unwrap_or(bot_username),
            names,
        ),
        RuleKind::All { rules } => and(resolve_all(rule, rules, built)?),
        RuleKind::Any { rules } => or(resolve_all(rule, rules, built)?),
        RuleKind::Not { rule: reference } => not(resolve(rule, reference, built)?),
    };

    Ok(filter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sift_core::{Message, User};

    fn rule(name: &str, kind: RuleKind) -> RuleConfig {
        RuleConfig {
            name: name.into(),
            kind,
        }
    }

    fn from(id: i64, text: &str) -> Update {
        Update::message(Message::with_text(text).sent_by(User::new(id)))
    }

    fn sample_rules() -> Vec<RuleConfig> {
        vec![
            rule(
                "start",
                RuleKind::Command {
                    names: vec!["start".into()],
                    prefix: "/".into(),
                    bot_username: None,
                },
            ),
            rule("admins", RuleKind::Whitelist { ids: vec![1] }),
            rule(
                "admin_start",
                RuleKind::All {
                    rules: vec!["start".into(), "admins".into()],
                },
            ),
            rule("others", RuleKind::Not { rule: "admins".into() }),
        ]
    }

    #[test]
    fn test_build_and_match() {
        let rules = RuleSet::from_rules(&sample_rules(), "mybot").unwrap();
        assert_eq!(rules.len(), 4);

        let matched: Vec<_> = rules.matching(&from(1, "/start@mybot")).collect();
        assert_eq!(matched, vec!["start", "admins", "admin_start"]);

        let matched: Vec<_> = rules.matching(&from(2, "/start")).collect();
        assert_eq!(matched, vec!["start", "others"]);

        assert_eq!(rules.first_match(&from(2, "hi")), Some("others"));
    }

    #[test]
    fn test_matched_names_outlive_update() {
        let rules = RuleSet::from_rules(&sample_rules(), "mybot").unwrap();

        let names: Vec<&str> = {
            let update = from(1, "/start");
            rules.matching(&update).collect()
        };
        let first = {
            let update = from(2, "hello");
            rules.first_match(&update)
        };

        assert_eq!(names, vec!["start", "admins", "admin_start"]);
        assert_eq!(first, Some("others"));
    }

    #[test]
    fn test_get_names_filter() {
        let rules = RuleSet::from_rules(&sample_rules(), "mybot").unwrap();
        let filter = rules.get("admin_start").unwrap();
        assert_eq!(filter.get_name(), "admin_start");
        assert!(rules.get("missing").is_none());
    }

    #[test]
    fn test_command_username_override() {
        let rules = RuleSet::from_rules(
            &[rule(
                "help",
                RuleKind::Command {
                    names: vec!["help".into()],
                    prefix: "/".into(),
                    bot_username: Some("helperbot".into()),
                },
            )],
            "mybot",
        )
        .unwrap();

        assert_eq!(rules.first_match(&from(1, "/help@helperbot")), Some("help"));
        assert_eq!(rules.first_match(&from(1, "/help@mybot")), None);
    }

    #[test]
    fn test_forward_reference_rejected() {
        let result = RuleSet::from_rules(
            &[
                rule("first", RuleKind::Not { rule: "second".into() }),
                rule("second", RuleKind::Always),
            ],
            "",
        );
        assert!(matches!(
            result,
            Err(ConfigError::UnknownRule { rule, reference }) if rule == "first" && reference == "second"
        ));
    }

    #[test]
    fn test_invalid_regex() {
        let result = RuleSet::from_rules(
            &[rule(
                "broken",
                RuleKind::Regex {
                    pattern: "(unclosed".into(),
                },
            )],
            "",
        );
        assert!(matches!(result, Err(ConfigError::InvalidPattern { .. })));
    }

    #[test]
    fn test_text_rules() {
        let rules = RuleSet::from_rules(
            &[
                rule("hello", RuleKind::Text { text: "hello".into() }),
                rule(
                    "yes_no",
                    RuleKind::Texts {
                        texts: vec!["yes".into(), "no".into()],
                    },
                ),
                rule("question", RuleKind::Suffix { suffix: "?".into() }),
                rule("bang", RuleKind::Prefix { prefix: "!".into() }),
                rule(
                    "digits",
                    RuleKind::Regex {
                        pattern: r"\d+".into(),
                    },
                ),
            ],
            "",
        )
        .unwrap();

        assert_eq!(rules.first_match(&from(1, "hello")), Some("hello"));
        assert_eq!(rules.first_match(&from(1, "no")), Some("yes_no"));
        assert_eq!(rules.first_match(&from(1, "why?")), Some("question"));
        assert_eq!(rules.first_match(&from(1, "!go")), Some("bang"));
        assert_eq!(rules.first_match(&from(1, "route 66")), Some("digits"));
        assert_eq!(rules.first_match(&from(1, "nothing")), None);
    }

    #[test]
    fn test_any_and_blacklist() {
        let rules = RuleSet::from_rules(
            &[
                rule("banned", RuleKind::Blacklist { ids: vec![9] }),
                rule("never", RuleKind::Never),
                rule(
                    "either",
                    RuleKind::Any {
                        rules: vec!["never".into(), "banned".into()],
                    },
                ),
            ],
            "",
        )
        .unwrap();

        let matched: Vec<_> = rules.matching(&from(9, "x")).collect();
        assert!(matched.is_empty());
        let matched: Vec<_> = rules.matching(&from(8, "x")).collect();
        assert_eq!(matched, vec!["banned", "either"]);
    }
}
