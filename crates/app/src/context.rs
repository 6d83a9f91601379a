//! App Context

use std::sync::Arc;

use thiserror::Error;

use crate::{
    domain::{
        carts::{CartSettings, CartsRepository, CartsService, DefaultCartsService, RedisCartsRepository},
        catalog::{CatalogError, HttpProductCatalog, HttpProductCatalogConfig},
    },
    store::{self, RedisStore, StoreError},
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to redis")]
    Store(#[source] StoreError),

    #[error("failed to configure product catalog")]
    Catalog(#[source] CatalogError),
}

/// Services shared by every entry point, built once at startup.
///
/// Dropping the last clone releases the Redis connection.
#[derive(Clone)]
pub struct AppContext {
    pub carts: Arc<dyn CartsService>,
    pub carts_repository: Arc<dyn CartsRepository>,
}

impl AppContext {
    /// Build application context from a Redis URL.
    ///
    /// The product catalog is optional; without it carts are neither stock
    /// checked nor validated against live prices.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a Redis connection fails or the
    /// catalog URL is invalid.
    pub async fn from_redis_url(
        url: &str,
        settings: CartSettings,
        catalog: Option<HttpProductCatalogConfig>,
    ) -> Result<Self, AppInitError> {
        let connection = store::connect(url).await.map_err(AppInitError::Store)?;

        let repository: Arc<dyn CartsRepository> = Arc::new(RedisCartsRepository::new(Arc::new(
            RedisStore::new(connection),
        )));

        let mut carts = DefaultCartsService::new(repository.clone(), settings);

        if let Some(config) = catalog {
            let catalog = HttpProductCatalog::new(&config).map_err(AppInitError::Catalog)?;

            carts = carts.with_catalog(Arc::new(catalog));
        }

        Ok(Self {
            carts: Arc::new(carts),
            carts_repository: repository,
        })
    }
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext").finish_non_exhaustive()
    }
}
