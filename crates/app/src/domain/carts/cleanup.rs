//! Periodic eviction of expired carts.
//!
//! Reads already evict expired carts lazily; this sweep catches the ones
//! nobody reads again. A failed pass is logged and the next tick runs as
//! normal.

use std::{fmt, sync::Arc, time::Duration};

use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::domain::carts::{CartsService, CartsServiceError};

/// How often the sweep runs by default.
pub const DEFAULT_CLEANUP_INTERVAL: Duration = Duration::from_secs(60 * 60);

type EvictedHook = Arc<dyn Fn(usize) + Send + Sync>;

#[derive(Clone)]
pub struct CartCleanupScheduler {
    carts: Arc<dyn CartsService>,
    interval: Duration,
    on_evicted: Option<EvictedHook>,
}

impl fmt::Debug for CartCleanupScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartCleanupScheduler")
            .field("interval", &self.interval)
            .finish_non_exhaustive()
    }
}

impl CartCleanupScheduler {
    #[must_use]
    pub fn new(carts: Arc<dyn CartsService>, interval: Duration) -> Self {
        Self {
            carts,
            interval,
            on_evicted: None,
        }
    }

    /// Invoke `hook` with the eviction count after every successful pass.
    #[must_use]
    pub fn on_evicted(mut self, hook: impl Fn(usize) + Send + Sync + 'static) -> Self {
        self.on_evicted = Some(Arc::new(hook));
        self
    }

    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Run a single sweep.
    ///
    /// # Errors
    ///
    /// Returns an error when the expired carts cannot be listed or removed.
    pub async fn run_once(&self) -> Result<usize, CartsServiceError> {
        let evicted = self.carts.cleanup_expired_carts().await?;

        if let Some(hook) = &self.on_evicted {
            hook(evicted);
        }

        Ok(evicted)
    }

    /// Sweep on every tick until `cancel` is triggered.
    ///
    /// The first sweep runs immediately.
    pub async fn run(&self, cancel: CancellationToken) {
        info!(
            interval_secs = self.interval.as_secs(),
            "cart cleanup scheduler started"
        );

        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                () = cancel.cancelled() => {
                    info!("cart cleanup scheduler stopping");
                    break;
                }
                _ = interval.tick() => {
                    match self.run_once().await {
                        Ok(0) => debug!("no expired carts to evict"),
                        Ok(evicted) => info!(evicted, "evicted expired carts"),
                        Err(error) => error!(error = %error, "expired cart cleanup failed"),
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    };

    use testresult::TestResult;

    use crate::{
        domain::carts::{CartsRepositoryError, MockCartsService},
        store::StoreError,
    };

    use super::*;

    #[tokio::test]
    async fn run_once_reports_and_forwards_the_count() -> TestResult {
        let mut carts = MockCartsService::new();

        carts
            .expect_cleanup_expired_carts()
            .once()
            .return_once(|| Ok(4));

        let seen = Arc::new(AtomicUsize::new(0));
        let hook_seen = seen.clone();

        let scheduler = CartCleanupScheduler::new(Arc::new(carts), DEFAULT_CLEANUP_INTERVAL)
            .on_evicted(move |evicted| {
                hook_seen.fetch_add(evicted, Ordering::SeqCst);
            });

        assert_eq!(scheduler.run_once().await?, 4);
        assert_eq!(seen.load(Ordering::SeqCst), 4);

        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn a_failed_pass_does_not_stop_later_passes() -> TestResult {
        let outcomes = Arc::new(Mutex::new(vec![Ok(2), Err(()), Ok(1)]));
        let calls = Arc::new(AtomicUsize::new(0));

        let mut carts = MockCartsService::new();
        let remaining = outcomes.clone();
        let counted = calls.clone();

        carts.expect_cleanup_expired_carts().returning(move || {
            counted.fetch_add(1, Ordering::SeqCst);

            let next = remaining
                .lock()
                .ok()
                .and_then(|mut outcomes| (!outcomes.is_empty()).then(|| outcomes.remove(0)))
                .unwrap_or(Ok(0));

            next.map_err(|()| {
                CartsServiceError::Storage(CartsRepositoryError::Store {
                    operation: "scan",
                    source: StoreError::Unavailable("down".to_string()),
                })
            })
        });

        let evicted = Arc::new(AtomicUsize::new(0));
        let total = evicted.clone();

        let scheduler = CartCleanupScheduler::new(Arc::new(carts), Duration::from_secs(60))
            .on_evicted(move |count| {
                total.fetch_add(count, Ordering::SeqCst);
            });

        let cancel = CancellationToken::new();
        let task = tokio::spawn({
            let cancel = cancel.clone();
            async move { scheduler.run(cancel).await }
        });

        // Ticks at 0s, 60s and 120s.
        tokio::time::sleep(Duration::from_secs(150)).await;

        cancel.cancel();
        task.await?;

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(evicted.load(Ordering::SeqCst), 3);

        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_stops_the_loop() -> TestResult {
        let mut carts = MockCartsService::new();

        carts.expect_cleanup_expired_carts().returning(|| Ok(0));

        let scheduler = CartCleanupScheduler::new(Arc::new(carts), DEFAULT_CLEANUP_INTERVAL);
        let cancel = CancellationToken::new();

        cancel.cancel();

        tokio::time::timeout(Duration::from_secs(1), scheduler.run(cancel)).await?;

        Ok(())
    }
}
