//! Cart Models

use std::fmt::{Display, Formatter, Result as FmtResult};

use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::uuids::TypedUuid;

/// Cart UUID
pub type CartId = TypedUuid<Cart>;

/// Who a cart belongs to.
///
/// A cart is owned either by a registered user or by an anonymous session,
/// never both. Serialized flattened as `"user_id": ".."` or `"session_id": ".."`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CartOwner {
    #[serde(rename = "user_id")]
    User(String),

    #[serde(rename = "session_id")]
    Session(String),
}

/// Attempted an ownership change other than session to user.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("cart is already owned by user {0}")]
pub struct OwnershipTransitionError(pub String);

impl CartOwner {
    /// Resolve the owner from caller-supplied identifiers, preferring the user.
    ///
    /// Blank identifiers are treated as absent.
    #[must_use]
    pub fn resolve(user_id: Option<&str>, session_id: Option<&str>) -> Option<Self> {
        let present = |value: Option<&str>| {
            value
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(ToOwned::to_owned)
        };

        present(user_id)
            .map(Self::User)
            .or_else(|| present(session_id).map(Self::Session))
    }

    /// Store key addressing this owner's current cart.
    #[must_use]
    pub fn key(&self) -> String {
        match self {
            Self::User(user_id) => format!("cart:user:{user_id}"),
            Self::Session(session_id) => format!("cart:session:{session_id}"),
        }
    }

    /// Hand a guest-owned cart over to `user_id`.
    ///
    /// # Errors
    ///
    /// Returns an error when the cart already belongs to a user.
    pub fn claim_for_user(&self, user_id: &str) -> Result<Self, OwnershipTransitionError> {
        match self {
            Self::Session(_) => Ok(Self::User(user_id.to_owned())),
            Self::User(current) => Err(OwnershipTransitionError(current.clone())),
        }
    }

    #[must_use]
    pub fn user_id(&self) -> Option<&str> {
        match self {
            Self::User(user_id) => Some(user_id),
            Self::Session(_) => None,
        }
    }

    #[must_use]
    pub fn session_id(&self) -> Option<&str> {
        match self {
            Self::Session(session_id) => Some(session_id),
            Self::User(_) => None,
        }
    }
}

impl Display for CartOwner {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::User(user_id) => write!(f, "user:{user_id}"),
            Self::Session(session_id) => write!(f, "session:{session_id}"),
        }
    }
}

/// Cart Model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    pub id: CartId,
    #[serde(flatten)]
    pub owner: CartOwner,
    pub items: Vec<CartItem>,
    pub subtotal: Decimal,
    pub currency: String,
    pub expires_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Cart {
    /// A fresh, empty cart for `owner`.
    #[must_use]
    pub fn empty(owner: CartOwner, currency: &str, now: Timestamp, expires_at: Timestamp) -> Self {
        Self {
            id: CartId::new(),
            owner,
            items: Vec::new(),
            subtotal: Decimal::ZERO,
            currency: currency.to_owned(),
            expires_at,
            created_at: now,
            updated_at: now,
        }
    }

    #[must_use]
    pub fn is_expired_at(&self, now: Timestamp) -> bool {
        self.expires_at <= now
    }

    #[must_use]
    pub fn id_key(&self) -> String {
        id_key(self.id)
    }

    pub fn find_item(&self, product_id: &str, sku: &str) -> Option<&CartItem> {
        self.items
            .iter()
            .find(|item| item.product_id == product_id && item.sku == sku)
    }

    pub(crate) fn position_of_product(&self, product_id: &str) -> Option<usize> {
        self.items
            .iter()
            .position(|item| item.product_id == product_id)
    }

    /// Recompute every line total and the subtotal from scratch.
    pub fn recalculate(&mut self) {
        for item in &mut self.items {
            item.recalculate();
        }

        self.subtotal = self.items.iter().map(|item| item.total).sum();
    }

    /// Total quantity across all lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    #[must_use]
    pub fn summary(&self) -> CartSummary {
        CartSummary {
            cart_id: self.id,
            line_count: self.items.len(),
            item_count: self.item_count(),
            subtotal: self.subtotal,
            currency: self.currency.clone(),
            expires_at: self.expires_at,
        }
    }
}

/// Store key addressing a cart by its own identifier.
#[must_use]
pub fn id_key(cart: CartId) -> String {
    format!("cart:id:{cart}")
}

/// Cart line item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub product_id: String,
    pub sku: String,
    pub name: String,
    pub price: Decimal,
    pub quantity: u32,
    pub total: Decimal,
}

impl CartItem {
    #[must_use]
    pub fn new(product_id: String, sku: String, name: String, price: Decimal, quantity: u32) -> Self {
        let mut item = Self {
            product_id,
            sku,
            name,
            price,
            quantity,
            total: Decimal::ZERO,
        };

        item.recalculate();

        item
    }

    pub fn recalculate(&mut self) {
        self.total = self.price * Decimal::from(self.quantity);
    }
}

/// Cart Summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartSummary {
    pub cart_id: CartId,
    pub line_count: usize,
    pub item_count: u64,
    pub subtotal: Decimal,
    pub currency: String,
    pub expires_at: Timestamp,
}

/// Outcome of re-checking a cart against the product catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartValidation {
    pub cart_id: CartId,
    pub valid: bool,
    pub issues: Vec<CartIssue>,
}

/// A single line that no longer matches the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartIssue {
    pub product_id: String,
    pub sku: String,
    pub kind: CartIssueKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartIssueKind {
    PriceChanged {
        cart_price: Decimal,
        current_price: Decimal,
    },
    Unavailable,
    InsufficientStock {
        requested: u32,
        available: u32,
    },
}
