//! Catalog errors.

use thiserror::Error;

/// Errors that can occur when talking to the product catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// An HTTP transport or serialization error occurred.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The configured base URL cannot carry a path.
    #[error("invalid catalog url: {0}")]
    InvalidUrl(String),

    /// The catalog returned a non-2xx response other than 404.
    #[error("unexpected response from catalog: {0}")]
    UnexpectedResponse(String),
}
