//! The [`Filter`] capability and its closure-backed implementation.
//!
//! A filter is a pure predicate over an [`Update`]. Every constructor in this
//! crate returns a [`FilterFn`], a cheaply clonable wrapper around a
//! type-erased check function, so filters of different kinds can be mixed
//! freely in combinators:
//!
//! ```rust,ignore
//! use sift_filters::{and, command, whitelist, with_prefix};
//!
//! let admin_start = and([command("start", "mybot"), whitelist([1, 2, 3])]);
//! let shout = with_prefix("!") | with_prefix("/shout");
//! let not_admin = !whitelist([1, 2, 3]);
//! ```
//!
//! User-defined filters implement [`Filter`] and join the algebra through
//! [`FilterFn::from_filter`] or the [`FilterExt`] methods.

use std::borrow::Cow;
use std::fmt;
use std::ops::{BitAnd, BitOr, Not};
use std::sync::Arc;

use sift_core::Update;

/// A reusable boolean predicate over an update.
///
/// Implementations must be pure: the result may only depend on the update and
/// on parameters captured at construction time. This is what makes it safe to
/// evaluate one filter from many threads at once.
pub trait Filter: Send + Sync {
    /// Returns `true` if `update` passes this filter.
    fn check(&self, update: &Update) -> bool;
}

impl<F: Filter + ?Sized> Filter for &F {
    fn check(&self, update: &Update) -> bool {
        (**self).check(update)
    }
}

impl<F: Filter + ?Sized> Filter for Box<F> {
    fn check(&self, update: &Update) -> bool {
        (**self).check(update)
    }
}

impl<F: Filter + ?Sized> Filter for Arc<F> {
    fn check(&self, update: &Update) -> bool {
        (**self).check(update)
    }
}

/// A type-erased check function.
pub type CheckFn = Arc<dyn Fn(&Update) -> bool + Send + Sync>;

/// A filter wrapping a predicate closure.
///
/// Cloning only bumps a reference count.
#[derive(Clone)]
pub struct FilterFn {
    check_fn: CheckFn,
    name: Cow<'static, str>,
}

impl FilterFn {
    /// Wraps a predicate closure. This is the factory every built-in filter
    /// goes through.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Update) -> bool + Send + Sync + 'static,
    {
        Self {
            check_fn: Arc::new(f),
            name: Cow::Borrowed("custom"),
        }
    }

    /// Lifts any [`Filter`] implementation into a `FilterFn`.
    pub fn from_filter<F>(filter: F) -> Self
    where
        F: Filter + 'static,
    {
        Self::new(move |update| filter.check(update))
    }

    /// Sets a name for this filter (shown in `Debug` output and logs).
    pub fn name(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = name.into();
        self
    }

    /// Returns the name of this filter.
    pub fn get_name(&self) -> &str {
        &self.name
    }
}

impl Filter for FilterFn {
    fn check(&self, update: &Update) -> bool {
        (self.check_fn)(update)
    }
}

impl fmt::Debug for FilterFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterFn").field("name", &self.name).finish()
    }
}

// ============================================================================
// Constants
// ============================================================================

/// A filter that passes every update.
pub fn always() -> FilterFn {
    FilterFn::new(|_| true).name("always")
}

/// A filter that rejects every update.
pub fn never() -> FilterFn {
    FilterFn::new(|_| false).name("never")
}

// ============================================================================
// Operators
// ============================================================================

impl BitAnd for FilterFn {
    type Output = FilterFn;

    fn bitand(self, rhs: FilterFn) -> FilterFn {
        crate::logic::and([self, rhs])
    }
}

impl BitOr for FilterFn {
    type Output = FilterFn;

    fn bitor(self, rhs: FilterFn) -> FilterFn {
        crate::logic::or([self, rhs])
    }
}

impl Not for FilterFn {
    type Output = FilterFn;

    fn not(self) -> FilterFn {
        crate::logic::not(self)
    }
}

/// Combinator methods available on every [`Filter`].
pub trait FilterExt: Filter + Sized + 'static {
    /// Passes when both `self` and `other` pass. `other` is not evaluated if
    /// `self` fails.
    fn and<F: Filter + 'static>(self, other: F) -> FilterFn {
        let (left, right) = (self, other);
        FilterFn::new(move |update| left.check(update) && right.check(update)).name("and")
    }

    /// Passes when `self` or `other` passes. `other` is not evaluated if
    /// `self` passes.
    fn or<F: Filter + 'static>(self, other: F) -> FilterFn {
        let (left, right) = (self, other);
        FilterFn::new(move |update| left.check(update) || right.check(update)).name("or")
    }

    /// Inverts this filter.
    fn negate(self) -> FilterFn {
        FilterFn::new(move |update| !self.check(update)).name("not")
    }

    /// Type-erases this filter.
    fn boxed(self) -> FilterFn {
        FilterFn::from_filter(self)
    }
}

impl<F: Filter + Sized + 'static> FilterExt for F {}
