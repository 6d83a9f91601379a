//! Cart Data

use rust_decimal::Decimal;

/// New Cart Item Data
///
/// Quantity is signed so that non-positive requests can be rejected with a
/// meaningful error rather than failing to parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCartItem {
    pub product_id: String,
    pub sku: String,
    pub name: String,
    pub price: Decimal,
    pub quantity: i64,
}
