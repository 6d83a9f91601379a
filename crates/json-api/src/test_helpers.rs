//! Test helpers.

use std::{sync::Arc, time::Duration};

use jiff::{SignedDuration, Timestamp};
use rust_decimal::Decimal;
use salvo::{affix_state::inject, prelude::*};

use cartstore_app::domain::carts::{
    MockCartsService,
    models::{Cart, CartItem, CartOwner},
};

use crate::{extensions::*, state::State};

pub(crate) const TEST_SESSION_ID: &str = "test-session";

pub(crate) fn test_owner() -> CartOwner {
    CartOwner::Session(TEST_SESSION_ID.to_string())
}

#[salvo::handler]
pub(crate) async fn inject_owner(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_cart_owner(test_owner());
    ctrl.call_next(req, depot, res).await;
}

pub(crate) fn state_with_carts(carts: MockCartsService) -> Arc<State> {
    Arc::new(State::new(Arc::new(carts), Duration::from_secs(60)))
}

/// Serve `route` with the given mock and a fixed guest owner.
pub(crate) fn carts_service(carts: MockCartsService, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state_with_carts(carts)))
            .hoop(inject_owner)
            .push(route),
    )
}

/// Serve `route` with the given mock and no owner in the depot.
pub(crate) fn anonymous_service(carts: MockCartsService, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state_with_carts(carts)))
            .push(route),
    )
}

pub(crate) fn make_cart(items: Vec<CartItem>) -> Cart {
    let now = Timestamp::UNIX_EPOCH;
    let expires_at = now
        .checked_add(SignedDuration::from_hours(24))
        .unwrap_or(Timestamp::MAX);

    let mut cart = Cart::empty(test_owner(), "USD", now, expires_at);

    cart.items = items;
    cart.recalculate();

    cart
}

pub(crate) fn make_item(product_id: &str, price: i64, quantity: u32) -> CartItem {
    CartItem::new(
        product_id.to_string(),
        format!("{product_id}-sku"),
        format!("Product {product_id}"),
        Decimal::new(price, 2),
        quantity,
    )
}
