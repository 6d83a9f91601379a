//! Validate Cart Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    carts::{errors::into_status_error, responses::CartValidationResponse},
    extensions::*,
    state::State,
};

/// Validate Cart Handler
///
/// Re-checks every line against the product catalog. Stale lines are
/// reported as issues; the request itself still succeeds.
#[endpoint(
    tags("carts"),
    summary = "Validate Cart",
    responses(
        (status_code = StatusCode::OK, description = "Validation result"),
        (status_code = StatusCode::BAD_REQUEST, description = "Missing owner headers"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    depot: &mut Depot,
) -> Result<Json<CartValidationResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let owner = depot.cart_owner_or_400()?;

    let validation = state
        .carts
        .validate_cart(owner)
        .await
        .map_err(into_status_error)?;

    Ok(Json(validation.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use cartstore_app::domain::{
        carts::{
            CartsServiceError, MockCartsService,
            models::{CartId, CartIssue, CartIssueKind, CartValidation},
        },
        catalog::CatalogError,
    };

    use crate::test_helpers::carts_service;

    use super::*;

    fn route() -> Router {
        Router::with_path("cart/validate").post(handler)
    }

    #[tokio::test]
    async fn test_validate_reports_issues_with_200() -> TestResult {
        let mut carts = MockCartsService::new();

        carts.expect_validate_cart().once().return_once(|_| {
            Ok(CartValidation {
                cart_id: CartId::new(),
                valid: false,
                issues: vec![CartIssue {
                    product_id: "p1".into(),
                    sku: "p1-sku".into(),
                    kind: CartIssueKind::Unavailable,
                }],
            })
        });

        let mut res = TestClient::post("http://example.com/cart/validate")
            .send(&carts_service(carts, route()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let body: CartValidationResponse = res.take_json().await?;

        assert!(!body.valid, "an unavailable line invalidates the cart");
        assert_eq!(
            body.issues.first().map(|issue| issue.kind.as_str()),
            Some("unavailable")
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_validate_catalog_failure_returns_500() -> TestResult {
        let mut carts = MockCartsService::new();

        carts.expect_validate_cart().once().return_once(|_| {
            Err(CartsServiceError::Catalog(CatalogError::UnexpectedResponse(
                "503 Service Unavailable".into(),
            )))
        });

        let res = TestClient::post("http://example.com/cart/validate")
            .send(&carts_service(carts, route()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::INTERNAL_SERVER_ERROR));

        Ok(())
    }
}
