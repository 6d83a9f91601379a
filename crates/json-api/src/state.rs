//! State

use std::{sync::Arc, time::Duration};

use cartstore_app::{
    context::AppContext,
    domain::carts::{CartCleanupScheduler, CartsService},
};

use crate::observability::record_evicted_carts;

#[derive(Clone)]
pub(crate) struct State {
    pub(crate) carts: Arc<dyn CartsService>,
    pub(crate) cleanup: CartCleanupScheduler,
}

impl std::fmt::Debug for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("State")
            .field("cleanup", &self.cleanup)
            .finish_non_exhaustive()
    }
}

impl State {
    #[must_use]
    pub(crate) fn new(carts: Arc<dyn CartsService>, cleanup_interval: Duration) -> Self {
        let cleanup =
            CartCleanupScheduler::new(carts.clone(), cleanup_interval).on_evicted(record_evicted_carts);

        Self { carts, cleanup }
    }

    #[must_use]
    pub(crate) fn from_app_context(app: &AppContext, cleanup_interval: Duration) -> Arc<Self> {
        Arc::new(Self::new(app.carts.clone(), cleanup_interval))
    }
}
