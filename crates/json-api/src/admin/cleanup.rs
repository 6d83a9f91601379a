//! Cart Cleanup Handler

use std::sync::Arc;

use salvo::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{carts::errors::into_status_error, extensions::*, state::State};

/// Cart Cleanup Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CleanupResponse {
    /// Number of expired carts removed
    pub evicted: usize,
}

/// Cart Cleanup Handler
///
/// Runs one expired-cart sweep immediately instead of waiting for the
/// scheduler.
#[endpoint(
    tags("admin"),
    summary = "Evict Expired Carts",
    responses(
        (status_code = StatusCode::OK, description = "Sweep completed"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<CleanupResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let evicted = state
        .cleanup
        .run_once()
        .await
        .map_err(into_status_error)?;

    info!(evicted, "manual cart cleanup completed");

    Ok(Json(CleanupResponse { evicted }))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use cartstore_app::{
        domain::carts::{CartsRepositoryError, CartsServiceError, MockCartsService},
        store::StoreError,
    };

    use crate::test_helpers::anonymous_service;

    use super::*;

    fn route() -> Router {
        Router::with_path("admin/carts/cleanup").post(handler)
    }

    #[tokio::test]
    async fn test_cleanup_reports_evicted_count() -> TestResult {
        let mut carts = MockCartsService::new();

        carts
            .expect_cleanup_expired_carts()
            .once()
            .return_once(|| Ok(3));

        let mut res = TestClient::post("http://example.com/admin/carts/cleanup")
            .send(&anonymous_service(carts, route()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let body: CleanupResponse = res.take_json().await?;

        assert_eq!(body.evicted, 3);

        Ok(())
    }

    #[tokio::test]
    async fn test_cleanup_store_failure_returns_500() -> TestResult {
        let mut carts = MockCartsService::new();

        carts.expect_cleanup_expired_carts().once().return_once(|| {
            Err(CartsServiceError::Storage(CartsRepositoryError::Store {
                operation: "scan",
                source: StoreError::Unavailable("down".into()),
            }))
        });

        let res = TestClient::post("http://example.com/admin/carts/cleanup")
            .send(&anonymous_service(carts, route()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::INTERNAL_SERVER_ERROR));

        Ok(())
    }
}
