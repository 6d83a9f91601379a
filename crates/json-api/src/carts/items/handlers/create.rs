//! Create Cart Item Handler

use std::{str::FromStr, sync::Arc};

use rust_decimal::Decimal;
use salvo::{http::header::LOCATION, oapi::extract::JsonBody, prelude::*};
use serde::{Deserialize, Serialize};

use cartstore_app::domain::carts::data::NewCartItem;

use crate::{
    carts::{errors::into_status_error, responses::CartResponse},
    extensions::*,
    state::State,
};

/// Create Cart Item Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateCartItemRequest {
    pub product_id: String,
    pub sku: String,
    pub name: String,

    /// Unit price as a decimal string, e.g. `"19.99"`
    pub price: String,

    /// Units to add; added to any existing line for the same SKU
    pub quantity: i64,
}

impl TryFrom<CreateCartItemRequest> for NewCartItem {
    type Error = StatusError;

    fn try_from(request: CreateCartItemRequest) -> Result<Self, Self::Error> {
        let price = Decimal::from_str(request.price.trim())
            .map_err(|_ignored| StatusError::bad_request().brief("Invalid price"))?;

        Ok(NewCartItem {
            product_id: request.product_id,
            sku: request.sku,
            name: request.name,
            price,
            quantity: request.quantity,
        })
    }
}

/// Create Cart Item Handler
#[endpoint(
    tags("carts"),
    summary = "Add Item to Cart",
    responses(
        (status_code = StatusCode::CREATED, description = "Item added"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::CONFLICT, description = "Insufficient stock"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreateCartItemRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let owner = depot.cart_owner_or_400()?;

    let item = NewCartItem::try_from(json.into_inner())?;

    let cart = state
        .carts
        .add_item(owner, item)
        .await
        .map_err(into_status_error)?;

    res.add_header(LOCATION, "/cart", true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(cart.into()))
}
