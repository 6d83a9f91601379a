//! Merge Guest Cart Handler

use std::sync::Arc;

use salvo::{oapi::extract::JsonBody, prelude::*};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    carts::{errors::into_status_error, responses::CartResponse},
    extensions::*,
    state::State,
};

/// Merge Guest Cart Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct MergeCartRequest {
    /// The guest session whose cart is handed over
    pub session_id: String,

    /// The user logging in
    pub user_id: String,
}

/// Merge Guest Cart Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct MergeCartResponse {
    /// Whether a guest cart existed and was migrated
    pub merged: bool,

    /// The user's cart after migration
    pub cart: Option<CartResponse>,
}

/// Merge Guest Cart Handler
///
/// Moves a guest cart onto a user at login, merging it with any cart the
/// user already has. Identifies both parties from the body, not from headers.
#[endpoint(
    tags("carts"),
    summary = "Merge Guest Cart",
    responses(
        (status_code = StatusCode::OK, description = "Migration result"),
        (status_code = StatusCode::BAD_REQUEST, description = "Missing session or user id"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<MergeCartRequest>,
    depot: &mut Depot,
) -> Result<Json<MergeCartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let MergeCartRequest {
        session_id,
        user_id,
    } = json.into_inner();

    let cart = state
        .carts
        .migrate_guest_cart(session_id, user_id)
        .await
        .map_err(into_status_error)?;

    if cart.is_none() {
        info!("no guest cart to merge");
    }

    Ok(Json(MergeCartResponse {
        merged: cart.is_some(),
        cart: cart.map(CartResponse::from),
    }))
}
