//! Tower integration.
//!
//! Dispatch is left to the host application, but when it is built from tower
//! services a filter can gate a service like any other middleware:
//!
//! ```rust,ignore
//! use sift_filters::{command, on, ServiceBuilderExt};
//! use tower::ServiceBuilder;
//!
//! let start = on(command("start", "mybot")).service_fn(handle_start);
//!
//! let admin_only = ServiceBuilder::new()
//!     .filter_updates(whitelist([1, 2, 3]))
//!     .service_fn(handle_admin);
//! ```
//!
//! Updates that do not pass are rejected with [`UpdateSkipped`] before the
//! inner service is called.

use std::sync::Arc;

use sift_core::Update;
use tower::BoxError;
use tower::ServiceBuilder;
use tower::filter::{FilterLayer, Predicate};
use tower_layer::{Identity, Stack};
use tracing::trace;

use crate::error::UpdateSkipped;
use crate::filter::Filter;

/// A [`Predicate`] that lets through updates passing `F`.
#[derive(Clone, Debug)]
pub struct UpdatePredicate<F> {
    filter: F,
}

impl<F: Filter> UpdatePredicate<F> {
    /// Wraps a filter.
    pub fn new(filter: F) -> Self {
        Self { filter }
    }

    /// Returns the wrapped filter.
    pub fn filter(&self) -> &F {
        &self.filter
    }
}

impl<F: Filter> Predicate<Arc<Update>> for UpdatePredicate<F> {
    type Request = Arc<Update>;

    fn check(&mut self, update: Arc<Update>) -> Result<Arc<Update>, BoxError> {
        if self.filter.check(&update) {
            Ok(update)
        } else {
            trace!(
                update_id = update.update_id,
                kind = update.kind.name(),
                "Update rejected by filter"
            );
            Err(Box::new(UpdateSkipped))
        }
    }
}

/// The `ServiceBuilder` returned by [`on`].
pub type FilterServiceBuilder<F> = ServiceBuilder<Stack<FilterLayer<UpdatePredicate<F>>, Identity>>;

/// Creates a [`ServiceBuilder`] that only passes updates accepted by `filter`.
pub fn on<F: Filter>(filter: F) -> FilterServiceBuilder<F> {
    ServiceBuilder::new().filter_updates(filter)
}

/// Extension trait for [`tower::ServiceBuilder`].
pub trait ServiceBuilderExt<L> {
    /// Stacks a filter layer that rejects updates not accepted by `filter`.
    ///
    /// Equivalent to `.filter(UpdatePredicate::new(filter))`.
    fn filter_updates<F: Filter>(
        self,
        filter: F,
    ) -> ServiceBuilder<Stack<FilterLayer<UpdatePredicate<F>>, L>>;
}

impl<L> ServiceBuilderExt<L> for ServiceBuilder<L> {
    fn filter_updates<F: Filter>(
        self,
        filter: F,
    ) -> ServiceBuilder<Stack<FilterLayer<UpdatePredicate<F>>, L>> {
        self.filter(UpdatePredicate::new(filter))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::command::command;
    use crate::error::is_skipped;
    use sift_core::Message;
    use tower::ServiceExt;

    fn message(text: &str) -> Arc<Update> {
        Arc::new(Update::new(7, sift_core::UpdateKind::Message(Message::with_text(text))))
    }

    #[test]
    fn test_filtered_service_calls_inner_on_match() {
        let svc = on(command("start", "mybot"))
            .service_fn(|update: Arc<Update>| async move { Ok::<_, BoxError>(update.update_id) });

        let result = tokio_test::block_on(svc.oneshot(message("/start")));
        assert_eq!(result.unwrap(), 7);
    }

    #[test]
    fn test_filtered_service_skips_mismatch() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let svc = on(command("start", "mybot")).service_fn(move |_: Arc<Update>| {
            counter.fetch_add(1, Ordering::SeqCst);
            async { Ok::<_, BoxError>(()) }
        });

        let err = tokio_test::block_on(svc.oneshot(message("/help"))).unwrap_err();
        assert!(is_skipped(err.as_ref()));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_inner_errors_are_not_skips() {
        let svc = on(command("start", "mybot")).service_fn(|_: Arc<Update>| async {
            Err::<(), BoxError>("handler failed".into())
        });

        let err = tokio_test::block_on(svc.oneshot(message("/start"))).unwrap_err();
        assert!(!is_skipped(err.as_ref()));
    }
}
