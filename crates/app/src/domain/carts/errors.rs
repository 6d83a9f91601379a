//! Carts errors.

use thiserror::Error;

use crate::{
    domain::{
        carts::models::OwnershipTransitionError,
        catalog::CatalogError,
    },
    store::StoreError,
};

/// Broad category of a failure, independent of the transport reporting it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Conflict,
    Internal,
}

#[derive(Debug, Error)]
pub enum CartsRepositoryError {
    #[error("store error during {operation}")]
    Store {
        operation: &'static str,
        #[source]
        source: StoreError,
    },

    #[error("stored cart at {key} could not be decoded")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("cart could not be encoded")]
    Encode(#[source] serde_json::Error),

    #[error("invalid ownership change")]
    Ownership(#[from] OwnershipTransitionError),
}

impl CartsRepositoryError {
    pub(crate) fn store(operation: &'static str) -> impl FnOnce(StoreError) -> Self {
        move |source| Self::Store { operation, source }
    }
}

#[derive(Debug, Error)]
pub enum CartsServiceError {
    #[error("a user id or session id is required")]
    MissingOwner,

    #[error("quantity must be positive, got {0}")]
    InvalidQuantity(i64),

    #[error("price must not be negative")]
    InvalidPrice,

    #[error("expiry extension must be between {min} and {max} hours, got {requested}")]
    InvalidExtension { requested: i64, min: u32, max: u32 },

    #[error("unknown product {product_id} ({sku})")]
    UnknownProduct { product_id: String, sku: String },

    #[error("cart not found")]
    NotFound,

    #[error("item not found in cart")]
    ItemNotFound,

    #[error("insufficient stock for {product_id}: requested {requested}, available {available}")]
    InsufficientStock {
        product_id: String,
        requested: u32,
        available: u32,
    },

    #[error("storage error")]
    Storage(#[from] CartsRepositoryError),

    #[error("product catalog error")]
    Catalog(#[from] CatalogError),
}

impl CartsServiceError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingOwner
            | Self::InvalidQuantity(_)
            | Self::InvalidPrice
            | Self::InvalidExtension { .. }
            | Self::UnknownProduct { .. } => ErrorKind::Validation,
            Self::NotFound | Self::ItemNotFound => ErrorKind::NotFound,
            Self::InsufficientStock { .. } => ErrorKind::Conflict,
            Self::Storage(_) | Self::Catalog(_) => ErrorKind::Internal,
        }
    }
}
