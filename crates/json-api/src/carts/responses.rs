//! Cart response bodies.
//!
//! Money amounts are rendered as decimal strings so clients never round
//! through floating point.

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use cartstore_app::domain::carts::models::{
    Cart, CartIssue, CartIssueKind, CartItem, CartSummary, CartValidation,
};

/// Cart Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartResponse {
    /// The unique identifier of the cart
    pub id: Uuid,

    /// The registered user owning the cart
    pub user_id: Option<String>,

    /// The guest session owning the cart
    pub session_id: Option<String>,

    /// The items in the cart
    pub items: Vec<CartItemResponse>,

    /// Sum of all line totals
    pub subtotal: String,

    /// ISO 4217 currency code
    pub currency: String,

    /// The date and time the cart expires
    pub expires_at: String,

    /// The date and time the cart was created
    pub created_at: String,

    /// The date and time the cart was last updated
    pub updated_at: String,
}

impl From<Cart> for CartResponse {
    fn from(cart: Cart) -> Self {
        CartResponse {
            id: cart.id.into_uuid(),
            user_id: cart.owner.user_id().map(ToOwned::to_owned),
            session_id: cart.owner.session_id().map(ToOwned::to_owned),
            items: cart.items.into_iter().map(CartItemResponse::from).collect(),
            subtotal: cart.subtotal.to_string(),
            currency: cart.currency,
            expires_at: cart.expires_at.to_string(),
            created_at: cart.created_at.to_string(),
            updated_at: cart.updated_at.to_string(),
        }
    }
}

/// Cart Item Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartItemResponse {
    pub product_id: String,
    pub sku: String,
    pub name: String,

    /// Unit price
    pub price: String,

    pub quantity: u32,

    /// `price * quantity`
    pub total: String,
}

impl From<CartItem> for CartItemResponse {
    fn from(item: CartItem) -> Self {
        Self {
            product_id: item.product_id,
            sku: item.sku,
            name: item.name,
            price: item.price.to_string(),
            quantity: item.quantity,
            total: item.total.to_string(),
        }
    }
}

/// Cart Summary Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartSummaryResponse {
    pub cart_id: Uuid,

    /// Number of distinct lines
    pub line_count: usize,

    /// Number of units across all lines
    pub item_count: u64,

    pub subtotal: String,
    pub currency: String,
    pub expires_at: String,
}

impl From<CartSummary> for CartSummaryResponse {
    fn from(summary: CartSummary) -> Self {
        Self {
            cart_id: summary.cart_id.into_uuid(),
            line_count: summary.line_count,
            item_count: summary.item_count,
            subtotal: summary.subtotal.to_string(),
            currency: summary.currency,
            expires_at: summary.expires_at.to_string(),
        }
    }
}

/// Cart Validation Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartValidationResponse {
    pub cart_id: Uuid,

    /// Whether every line still matches the catalog
    pub valid: bool,

    pub issues: Vec<CartIssueResponse>,
}

impl From<CartValidation> for CartValidationResponse {
    fn from(validation: CartValidation) -> Self {
        Self {
            cart_id: validation.cart_id.into_uuid(),
            valid: validation.valid,
            issues: validation
                .issues
                .into_iter()
                .map(CartIssueResponse::from)
                .collect(),
        }
    }
}

/// A cart line that no longer matches the catalog
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartIssueResponse {
    pub product_id: String,
    pub sku: String,

    /// One of `price_changed`, `unavailable` or `insufficient_stock`
    pub kind: String,

    /// Price held in the cart, for `price_changed`
    pub cart_price: Option<String>,

    /// Current catalog price, for `price_changed`
    pub current_price: Option<String>,

    /// Units requested, for `insufficient_stock`
    pub requested: Option<u32>,

    /// Units in stock, for `insufficient_stock`
    pub available: Option<u32>,
}

impl From<CartIssue> for CartIssueResponse {
    fn from(issue: CartIssue) -> Self {
        let mut response = Self {
            product_id: issue.product_id,
            sku: issue.sku,
            kind: String::new(),
            cart_price: None,
            current_price: None,
            requested: None,
            available: None,
        };

        match issue.kind {
            CartIssueKind::PriceChanged {
                cart_price,
                current_price,
            } => {
                response.kind = "price_changed".to_string();
                response.cart_price = Some(cart_price.to_string());
                response.current_price = Some(current_price.to_string());
            }
            CartIssueKind::Unavailable => {
                response.kind = "unavailable".to_string();
            }
            CartIssueKind::InsufficientStock {
                requested,
                available,
            } => {
                response.kind = "insufficient_stock".to_string();
                response.requested = Some(requested);
                response.available = Some(available);
            }
        }

        response
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use cartstore_app::domain::carts::models::CartId;

    use crate::test_helpers::{make_cart, make_item};

    use super::*;

    #[test]
    fn cart_amounts_are_rendered_as_strings() {
        let cart = make_cart(vec![make_item("p1", 1999, 2)]);

        let response = CartResponse::from(cart);

        assert_eq!(response.subtotal, "39.98");
        assert_eq!(response.items.first().map(|item| item.price.as_str()), Some("19.99"));
        assert_eq!(response.session_id.as_deref(), Some("test-session"));
        assert_eq!(response.user_id, None);
    }

    #[test]
    fn price_change_issue_carries_both_prices() {
        let issue = CartIssueResponse::from(CartIssue {
            product_id: "p1".into(),
            sku: "p1-sku".into(),
            kind: CartIssueKind::PriceChanged {
                cart_price: Decimal::new(1000, 2),
                current_price: Decimal::new(1200, 2),
            },
        });

        assert_eq!(issue.kind, "price_changed");
        assert_eq!(issue.cart_price.as_deref(), Some("10.00"));
        assert_eq!(issue.current_price.as_deref(), Some("12.00"));
        assert_eq!(issue.requested, None);
    }

    #[test]
    fn validation_lists_every_issue() {
        let cart_id = CartId::new();

        let response = CartValidationResponse::from(CartValidation {
            cart_id,
            valid: false,
            issues: vec![
                CartIssue {
                    product_id: "p1".into(),
                    sku: "a".into(),
                    kind: CartIssueKind::Unavailable,
                },
                CartIssue {
                    product_id: "p2".into(),
                    sku: "b".into(),
                    kind: CartIssueKind::InsufficientStock {
                        requested: 5,
                        available: 2,
                    },
                },
            ],
        });

        assert_eq!(response.cart_id, cart_id.into_uuid());
        assert!(!response.valid, "issues make the cart invalid");
        assert_eq!(response.issues.len(), 2);
        assert_eq!(response.issues.get(1).and_then(|issue| issue.available), Some(2));
    }
}
