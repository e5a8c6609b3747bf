//! Bot command parsing and matching.
//!
//! A command is a message whose first word is `prefix + name`, optionally
//! addressed to a specific bot with `@username`:
//!
//! ```text
//! /start
//! /start@mybot
//! /start 42
//! /start@mybot 42
//! ```
//!
//! # Case
//!
//! [`parse_command`] defines what a command is, for callers and for the
//! [`commands`] filter alike. Command names and bot usernames compare
//! case-insensitively, so `/START` and `/Start@MyBot` match
//! `command("start", "mybot")`. The prefix must match exactly and arguments
//! are never touched.
//!
//! # Example
//!
//! ```rust,ignore
//! use sift_filters::{command, commands, parse_command};
//!
//! let start = command("start", "mybot");
//! let admin = commands("!", "mybot", ["ban", "kick"]);
//!
//! let parsed = parse_command("/echo@mybot \"hello world\" twice", "/").unwrap();
//! assert_eq!(parsed.name, "echo");
//! assert_eq!(parsed.arguments(), vec!["hello world", "twice"]);
//! ```

use std::collections::HashSet;

use sift_core::extract_update;

use crate::filter::FilterFn;

/// Splits `text` into its first space-separated word and the remainder.
fn split_head(text: &str) -> (&str, &str) {
    text.split_once(' ').unwrap_or((text, ""))
}

/// Strips a leading `@` and lower-cases the username.
///
/// Returns `None` when nothing is left, in which case no mention is accepted.
fn normalize_username(username: &str) -> Option<String> {
    let bare = username.strip_prefix('@').unwrap_or(username);
    (!bare.is_empty()).then(|| bare.to_lowercase())
}

// ============================================================================
// Parsing
// ============================================================================

/// A command parsed out of message text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand<'a> {
    /// Command name, lower-cased, without prefix or mention.
    pub name: String,
    /// Username the command was addressed to, without the `@`.
    pub mention: Option<&'a str>,
    /// Everything after the first space, untouched.
    pub args: &'a str,
}

impl ParsedCommand<'_> {
    /// Splits [`args`](Self::args) into words.
    ///
    /// Words are separated by whitespace. Single or double quotes group words,
    /// and inside double quotes a backslash escapes the next character.
    pub fn arguments(&self) -> Vec<String> {
        split_arguments(self.args)
    }
}

/// Parses `text` as a command introduced by `prefix`.
///
/// Returns `None` when `text` does not start with `prefix` or when the command
/// name is empty.
pub fn parse_command<'a>(text: &'a str, prefix: &str) -> Option<ParsedCommand<'a>> {
    let (head, args) = split_head(text);
    let body = head.strip_prefix(prefix)?;

    let (name, mention) = match body.split_once('@') {
        Some((name, mention)) => (name, Some(mention)),
        None => (body, None),
    };

    if name.is_empty() {
        return None;
    }

    Some(ParsedCommand {
        name: name.to_lowercase(),
        mention,
        args,
    })
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Quote {
    None,
    Single,
    Double,
}

fn split_arguments(input: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut word = String::new();
    // Distinguishes `""` (an empty word) from no word at all.
    let mut started = false;
    let mut quote = Quote::None;
    let mut chars = input.chars();

    while let Some(ch) = chars.next() {
        match (quote, ch) {
            (Quote::Double, '\\') => {
                if let Some(escaped) = chars.next() {
                    word.push(escaped);
                }
            }
            (Quote::Double, '"') | (Quote::Single, '\'') => quote = Quote::None,
            (Quote::None, '"') => {
                quote = Quote::Double;
                started = true;
            }
            (Quote::None, '\'') => {
                quote = Quote::Single;
                started = true;
            }
            (Quote::None, c) if c.is_whitespace() => {
                if started {
                    words.push(std::mem::take(&mut word));
                    started = false;
                }
            }
            (_, c) => {
                word.push(c);
                started = true;
            }
        }
    }

    if started {
        words.push(word);
    }

    words
}

// ============================================================================
// Filters
// ============================================================================

/// Matches the `/name` command, optionally addressed to `bot_username`.
///
/// Shorthand for `commands("/", bot_username, [name])`.
pub fn command(name: &str, bot_username: &str) -> FilterFn {
    commands("/", bot_username, [name])
}

/// Matches any of `names` introduced by `prefix`.
///
/// The names are copied and lower-cased; the caller's collection is left as
/// it was. Only message-like updates are considered (text, falling back to
/// caption). A message matches when [`parse_command`] finds one of `names`
/// and the command is either unaddressed or addressed to `bot_username`.
///
/// An empty `bot_username` (or a bare `"@"`) accepts no mention at all:
/// `/start` matches but `/start@` and `/start@anybot` do not.
pub fn commands<I, S>(prefix: &str, bot_username: &str, names: I) -> FilterFn
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let prefix = prefix.to_string();
    let names: HashSet<String> = names
        .into_iter()
        .map(|name| name.as_ref().to_lowercase())
        .collect();
    let username = normalize_username(bot_username);

    FilterFn::new(move |update| {
        let Some(msg) = extract_update(update).as_message() else {
            return false;
        };
        let Some(parsed) = parse_command(msg.text_or_caption(), &prefix) else {
            return false;
        };
        if !names.contains(&parsed.name) {
            return false;
        }

        match parsed.mention {
            None => true,
            Some(mention) => username
                .as_deref()
                .is_some_and(|username| mention.to_lowercase() == username),
        }
    })
    .name("commands")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::Filter;
    use sift_core::{CallbackQuery, InlineQuery, Message, Update, User};

    fn message(text: &str) -> Update {
        Update::message(Message::with_text(text))
    }

    #[test]
    fn test_command_matches() {
        let filter = command("start", "mybot");
        for text in ["/start", "/start@mybot", "/start 42", "/start@mybot 42"] {
            assert!(filter.check(&message(text)), "{text} should match");
        }
    }

    #[test]
    fn test_command_rejects() {
        let filter = command("start", "mybot");
        for text in ["/started", "start", "/star", "/start@otherbot", "x /start", ""] {
            assert!(!filter.check(&message(text)), "{text} should not match");
        }
    }

    #[test]
    fn test_command_case_insensitive() {
        let filter = command("start", "MyBot");
        assert!(filter.check(&message("/START")));
        assert!(filter.check(&message("/Start@mybot Args")));
        assert!(filter.check(&message("/start@MYBOT")));
    }

    #[test]
    fn test_command_username_with_at() {
        let filter = command("start", "@mybot");
        assert!(filter.check(&message("/start@mybot")));
        assert!(!filter.check(&message("/start@@mybot")));
    }

    #[test]
    fn test_command_empty_username_has_no_mention_form() {
        for username in ["", "@"] {
            let filter = command("start", username);
            assert!(filter.check(&message("/start")));
            assert!(filter.check(&message("/start 1")));
            assert!(!filter.check(&message("/start@")));
            assert!(!filter.check(&message("/start@anybot")));
        }
    }

    #[test]
    fn test_command_uses_caption() {
        let filter = command("start", "mybot");
        assert!(filter.check(&Update::message(Message::with_caption("/start 1"))));
    }

    #[test]
    fn test_command_ignores_non_messages() {
        let filter = command("start", "mybot");
        let callback = Update::callback_query(CallbackQuery {
            from: User::new(1),
            data: Some("/start".into()),
            ..Default::default()
        });
        let inline = Update::inline_query(InlineQuery {
            from: User::new(1),
            query: "/start".into(),
            ..Default::default()
        });
        assert!(!filter.check(&callback));
        assert!(!filter.check(&inline));
    }

    #[test]
    fn test_commands_copies_names() {
        let names = vec!["Start".to_string()];
        let filter = commands("/", "mybot", &names);

        assert_eq!(names, vec!["Start".to_string()]);
        assert!(filter.check(&message("/start")));
        assert!(filter.check(&message("/Start")));
    }

    #[test]
    fn test_commands_agree_with_parse_command() {
        let filter = command("echo", "MyBot");
        for text in ["/Echo@mybot hi", "/ECHO", "/echo@MYBOT", "/echo@", "/echo@other", "/echoes"] {
            let parsed = parse_command(text, "/");
            let expected = parsed.is_some_and(|p| {
                p.name == "echo" && p.mention.is_none_or(|m| m.eq_ignore_ascii_case("mybot"))
            });
            assert_eq!(filter.check(&message(text)), expected, "{text}");
        }
    }

    #[test]
    fn test_commands_prefix_is_exact() {
        let filter = commands("!A", "mybot", ["go"]);
        assert!(filter.check(&message("!Ago")));
        assert!(!filter.check(&message("!ago")));
    }

    #[test]
    fn test_commands_custom_prefix() {
        let filter = commands("!", "mybot", ["ban", "kick"]);
        assert!(filter.check(&message("!ban 12")));
        assert!(filter.check(&message("!kick@mybot")));
        assert!(!filter.check(&message("/ban")));
    }

    #[test]
    fn test_parse_command() {
        let parsed = parse_command("/Echo@mybot hello  world", "/").unwrap();
        assert_eq!(parsed.name, "echo");
        assert_eq!(parsed.mention, Some("mybot"));
        assert_eq!(parsed.args, "hello  world");
        assert_eq!(parsed.arguments(), vec!["hello", "world"]);
    }

    #[test]
    fn test_parse_command_without_args() {
        let parsed = parse_command("/start", "/").unwrap();
        assert_eq!(parsed.name, "start");
        assert_eq!(parsed.mention, None);
        assert_eq!(parsed.args, "");
        assert!(parsed.arguments().is_empty());
    }

    #[test]
    fn test_parse_command_rejects() {
        assert!(parse_command("start", "/").is_none());
        assert!(parse_command("/", "/").is_none());
        assert!(parse_command("/@mybot", "/").is_none());
    }

    #[test]
    fn test_split_arguments_quotes() {
        assert_eq!(
            split_arguments(r#""hello world" 'it"s' plain"#),
            vec!["hello world", r#"it"s"#, "plain"]
        );
    }

    #[test]
    fn test_split_arguments_escape_and_empty() {
        assert_eq!(split_arguments(r#""say \"hi\"""#), vec![r#"say "hi""#]);
        assert_eq!(split_arguments(r#"a "" b"#), vec!["a", "", "b"]);
        assert!(split_arguments(" \t\n ").is_empty());
    }
}
