//! Carts Config

use std::time::Duration;

use cartstore_app::domain::{
    carts::{CartSettings, InvalidCurrency},
    catalog::HttpProductCatalogConfig,
};
use clap::Args;

/// Cart behaviour settings.
#[derive(Debug, Args)]
pub struct CartsConfig {
    /// ISO 4217 currency code carts are priced in
    #[arg(long, env = "CART_CURRENCY", default_value = "USD")]
    pub cart_currency: String,

    /// Lifetime of a newly created cart, in hours
    #[arg(
        long,
        env = "CART_DEFAULT_TTL_HOURS",
        default_value_t = 24_u32,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub cart_default_ttl_hours: u32,

    /// Seconds between expired-cart sweeps
    #[arg(
        long,
        env = "CART_CLEANUP_INTERVAL_SECS",
        default_value_t = 3_600_u64,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub cart_cleanup_interval_secs: u64,

    /// Product catalog base URL; stock and price checks are skipped when unset
    #[arg(long, env = "CATALOG_URL")]
    pub catalog_url: Option<String>,
}

impl CartsConfig {
    /// Validated cart settings.
    ///
    /// # Errors
    ///
    /// Returns an error when the currency code is unknown.
    pub fn settings(&self) -> Result<CartSettings, InvalidCurrency> {
        CartSettings::new(&self.cart_currency, self.cart_default_ttl_hours)
    }

    #[must_use]
    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cart_cleanup_interval_secs)
    }

    #[must_use]
    pub fn catalog(&self) -> Option<HttpProductCatalogConfig> {
        self.catalog_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(|url| HttpProductCatalogConfig {
                base_url: url.to_string(),
            })
    }
}
