//! Cart Summary Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    carts::{errors::into_status_error, responses::CartSummaryResponse},
    extensions::*,
    state::State,
};

/// Cart Summary Handler
///
/// Returns line and unit counts with the subtotal.
#[endpoint(
    tags("carts"),
    summary = "Cart Summary",
    responses(
        (status_code = StatusCode::OK, description = "Cart summary"),
        (status_code = StatusCode::BAD_REQUEST, description = "Missing owner headers"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<CartSummaryResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let owner = depot.cart_owner_or_400()?;

    let summary = state
        .carts
        .summary(owner)
        .await
        .map_err(into_status_error)?;

    Ok(Json(summary.into()))
}
