//! Sender allow/deny lists.

use std::collections::HashSet;

use sift_core::extract_sender_id;

use crate::filter::FilterFn;
use crate::logic::not;

/// Passes when the sender of a message or callback query is one of `ids`.
///
/// Updates with no resolvable sender (inline queries, channel posts, messages
/// without `from`) never pass, not even against an empty list.
pub fn whitelist<I>(ids: I) -> FilterFn
where
    I: IntoIterator<Item = i64>,
{
    let ids: HashSet<i64> = ids.into_iter().collect();
    FilterFn::new(move |update| extract_sender_id(update).is_some_and(|id| ids.contains(&id)))
        .name("whitelist")
}

/// Passes unless the sender is one of `ids`.
///
/// Exactly `not(whitelist(ids))`, so updates without a resolvable sender
/// always pass.
pub fn blacklist<I>(ids: I) -> FilterFn
where
    I: IntoIterator<Item = i64>,
{
    not(whitelist(ids)).name("blacklist")
}
