//! Product catalog collaborator.
//!
//! Carts hold a snapshot of each line's price. The catalog is the live source
//! used to flag stale lines and to check stock before items are added.

use async_trait::async_trait;
use mockall::automock;

mod errors;
mod http;
pub mod models;

pub use errors::CatalogError;
pub use http::{HttpProductCatalog, HttpProductCatalogConfig};

use models::CatalogProduct;

#[automock]
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    /// Current listing for a product SKU, or `None` when the catalog does not know it.
    async fn lookup(
        &self,
        product_id: &str,
        sku: &str,
    ) -> Result<Option<CatalogProduct>, CatalogError>;
}
