//! Boolean combinators.
//!
//! Each combinator returns a new [`FilterFn`], so they nest to any depth.
//! Evaluation is left to right and stops as soon as the result is known.

use crate::filter::{Filter, FilterFn};

/// Passes when every filter passes. An empty list passes.
pub fn and<I>(filters: I) -> FilterFn
where
    I: IntoIterator,
    I::Item: Filter + 'static,
{
    let filters: Vec<I::Item> = filters.into_iter().collect();
    FilterFn::new(move |update| filters.iter().all(|filter| filter.check(update))).name("and")
}

/// Passes when at least one filter passes. An empty list never passes.
pub fn or<I>(filters: I) -> FilterFn
where
    I: IntoIterator,
    I::Item: Filter + 'static,
{
    let filters: Vec<I::Item> = filters.into_iter().collect();
    FilterFn::new(move |update| filters.iter().any(|filter| filter.check(update))).name("or")
}

/// Passes when `filter` fails.
pub fn not<F>(filter: F) -> FilterFn
where
    F: Filter + 'static,
{
    FilterFn::new(move |update| !filter.check(update)).name("not")
}
