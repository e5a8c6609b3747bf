//! Error types for sift filters.

use thiserror::Error;

/// Returned by [`UpdatePredicate`](crate::service::UpdatePredicate) when an
/// update does **not** pass its filter.
///
/// Routers should treat this as "not for this service" rather than as a
/// failure; see [`is_skipped`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("update skipped by filter")]
pub struct UpdateSkipped;

/// Returns `true` if `err` is an [`UpdateSkipped`] rejection.
pub fn is_skipped(err: &(dyn std::error::Error + Send + Sync + 'static)) -> bool {
    err.is::<UpdateSkipped>()
}
