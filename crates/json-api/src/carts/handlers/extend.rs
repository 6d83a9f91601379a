//! Extend Cart Expiry Handler

use std::sync::Arc;

use salvo::{oapi::extract::JsonBody, prelude::*};
use serde::{Deserialize, Serialize};

use crate::{
    carts::{errors::into_status_error, responses::CartResponse},
    extensions::*,
    state::State,
};

/// Extend Cart Expiry Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ExtendCartRequest {
    /// Hours from now until the cart expires, between 1 and 168
    pub hours: i64,
}

/// Extend Cart Expiry Handler
#[endpoint(
    tags("carts"),
    summary = "Extend Cart Expiry",
    responses(
        (status_code = StatusCode::OK, description = "Cart with the new expiry"),
        (status_code = StatusCode::BAD_REQUEST, description = "Hours out of range"),
        (status_code = StatusCode::NOT_FOUND, description = "Cart not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<ExtendCartRequest>,
    depot: &mut Depot,
) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let owner = depot.cart_owner_or_400()?;

    let cart = state
        .carts
        .extend_expiry(owner, json.into_inner().hours)
        .await
        .map_err(into_status_error)?;

    Ok(Json(cart.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::TestClient;
    use serde_json::json;
    use testresult::TestResult;

    use cartstore_app::domain::carts::{
        CartsServiceError, MAX_EXTENSION_HOURS, MIN_EXTENSION_HOURS, MockCartsService,
    };

    use crate::test_helpers::{carts_service, make_cart};

    use super::*;

    fn route() -> Router {
        Router::with_path("cart/extend").post(handler)
    }

    #[tokio::test]
    async fn test_extend_forwards_hours() -> TestResult {
        let mut carts = MockCartsService::new();

        carts
            .expect_extend_expiry()
            .once()
            .withf(|_, hours| *hours == 48)
            .return_once(|_, _| Ok(make_cart(Vec::new())));

        let res = TestClient::post("http://example.com/cart/extend")
            .json(&json!({ "hours": 48 }))
            .send(&carts_service(carts, route()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn test_extend_out_of_range_returns_400() -> TestResult {
        let mut carts = MockCartsService::new();

        carts.expect_extend_expiry().once().return_once(|_, hours| {
            Err(CartsServiceError::InvalidExtension {
                requested: hours,
                min: MIN_EXTENSION_HOURS,
                max: MAX_EXTENSION_HOURS,
            })
        });

        let res = TestClient::post("http://example.com/cart/extend")
            .json(&json!({ "hours": 500 }))
            .send(&carts_service(carts, route()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_extend_missing_cart_returns_404() -> TestResult {
        let mut carts = MockCartsService::new();

        carts
            .expect_extend_expiry()
            .once()
            .return_once(|_, _| Err(CartsServiceError::NotFound));

        let res = TestClient::post("http://example.com/cart/extend")
            .json(&json!({ "hours": 2 }))
            .send(&carts_service(carts, route()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
