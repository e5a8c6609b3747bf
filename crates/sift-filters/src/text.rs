//! Filters over the extracted update text.
//!
//! All of these compare against [`extract_update_text`]: a message's text (or
//! caption), a callback query's data, or an inline query's query. Updates
//! without text are seen as `""`.

use std::collections::HashSet;

use regex::Regex;
use sift_core::extract_update_text;

use crate::filter::FilterFn;

/// Passes when the text equals `text` exactly (case-sensitive).
pub fn text(text: impl Into<String>) -> FilterFn {
    let text = text.into();
    FilterFn::new(move |update| extract_update_text(update) == text).name("text")
}

/// Passes when the text equals any of `texts`.
pub fn texts<I, S>(texts: I) -> FilterFn
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let texts: HashSet<String> = texts.into_iter().map(Into::into).collect();
    FilterFn::new(move |update| texts.contains(extract_update_text(update))).name("texts")
}

/// Passes when the text begins with `prefix`.
pub fn with_prefix(prefix: impl Into<String>) -> FilterFn {
    let prefix = prefix.into();
    FilterFn::new(move |update| extract_update_text(update).starts_with(prefix.as_str()))
        .name("with_prefix")
}

/// Passes when the text ends with `suffix`.
pub fn with_suffix(suffix: impl Into<String>) -> FilterFn {
    let suffix = suffix.into();
    FilterFn::new(move |update| extract_update_text(update).ends_with(suffix.as_str()))
        .name("with_suffix")
}

/// Passes when `pattern` matches anywhere in the text.
///
/// Anchor the pattern (`^...$`) to require a full match.
pub fn regex(pattern: Regex) -> FilterFn {
    FilterFn::new(move |update| pattern.is_match(extract_update_text(update))).name("regex")
}
