//! Test Helpers

use std::str::FromStr;

use jiff::{SignedDuration, Timestamp};
use rust_decimal::Decimal;

use crate::domain::carts::{
    data::NewCartItem,
    models::{Cart, CartItem, CartOwner},
};

fn price(value: &str) -> Decimal {
    Decimal::from_str(value).unwrap_or_else(|error| panic!("bad test price {value}: {error}"))
}

/// A stored line item.
pub(crate) fn item(product_id: &str, sku: &str, unit_price: &str, quantity: u32) -> CartItem {
    CartItem::new(
        product_id.to_string(),
        sku.to_string(),
        format!("{product_id} {sku}"),
        price(unit_price),
        quantity,
    )
}

/// An add-item request.
pub(crate) fn new_item(product_id: &str, sku: &str, unit_price: &str, quantity: i64) -> NewCartItem {
    NewCartItem {
        product_id: product_id.to_string(),
        sku: sku.to_string(),
        name: format!("{product_id} {sku}"),
        price: price(unit_price),
        quantity,
    }
}

/// A cart holding `items`, expiring `expires_in` from now (negative for already expired).
pub(crate) fn cart_with_items(
    owner: CartOwner,
    items: Vec<CartItem>,
    expires_in: SignedDuration,
) -> Cart {
    let now = Timestamp::now();

    let mut cart = Cart::empty(owner, "USD", now, now + expires_in);
    cart.items = items;
    cart.recalculate();

    cart
}
