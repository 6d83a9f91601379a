//! Catalog Models

use rust_decimal::Decimal;
use serde::Deserialize;

/// Live catalog listing for one product SKU.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CatalogProduct {
    pub price: Decimal,

    #[serde(default = "available_by_default")]
    pub available: bool,

    /// Units on hand; `None` means stock is not tracked.
    #[serde(default)]
    pub stock: Option<u32>,
}

fn available_by_default() -> bool {
    true
}

impl CatalogProduct {
    /// Whether `quantity` units can currently be fulfilled.
    #[must_use]
    pub fn can_fulfil(&self, quantity: u32) -> bool {
        self.available && self.stock.is_none_or(|stock| stock >= quantity)
    }

    /// Units that can be supplied right now.
    #[must_use]
    pub fn available_units(&self) -> u32 {
        if self.available {
            self.stock.unwrap_or(u32::MAX)
        } else {
            0
        }
    }
}
