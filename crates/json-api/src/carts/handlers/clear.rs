//! Clear Cart Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    carts::{errors::into_status_error, responses::CartResponse},
    extensions::*,
    state::State,
};

/// Clear Cart Handler
///
/// Removes every item while keeping the cart itself.
#[endpoint(
    tags("carts"),
    summary = "Clear Cart",
    responses(
        (status_code = StatusCode::OK, description = "Emptied cart"),
        (status_code = StatusCode::BAD_REQUEST, description = "Missing owner headers"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let owner = depot.cart_owner_or_400()?;

    let cart = state
        .carts
        .clear_cart(owner)
        .await
        .map_err(into_status_error)?;

    Ok(Json(cart.into()))
}
