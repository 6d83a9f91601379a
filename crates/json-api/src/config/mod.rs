//! Server configuration module

use clap::Parser;

use crate::config::{
    carts::CartsConfig,
    observability::{LoggingConfig, ObservabilityConfig},
    server::ServerRuntimeConfig,
    store::StoreConfig,
};

pub(crate) mod carts;
pub(crate) mod observability;
pub(crate) mod server;
pub(crate) mod store;

/// Cart Store JSON API Server configuration
#[derive(Debug, Parser)]
#[command(name = "cartstore-json", about = "Cart Store JSON API Server", long_about = None)]
pub struct ServerConfig {
    /// Server network settings.
    #[command(flatten)]
    pub server: ServerRuntimeConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Observability (traces/metrics) settings.
    #[command(flatten)]
    pub observability: ObservabilityConfig,

    /// Redis settings.
    #[command(flatten)]
    pub store: StoreConfig,

    /// Cart behaviour settings.
    #[command(flatten)]
    pub carts: CartsConfig,
}

impl ServerConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    /// Get the socket address for binding
    #[must_use]
    pub fn socket_addr(&self) -> String {
        self.server.socket_addr()
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn parses_defaults_from_required_args() -> TestResult {
        let config = ServerConfig::try_parse_from([
            "cartstore-json",
            "--redis-url",
            "redis://localhost:6379",
        ])?;

        assert_eq!(config.socket_addr(), "0.0.0.0:8080");
        assert_eq!(config.carts.cart_currency, "USD");
        assert_eq!(config.carts.cleanup_interval().as_secs(), 3_600);
        assert_eq!(config.carts.catalog(), None);
        assert_eq!(config.carts.settings()?.currency(), "USD");

        Ok(())
    }

    #[test]
    fn rejects_zero_cleanup_interval() {
        let result = ServerConfig::try_parse_from([
            "cartstore-json",
            "--redis-url",
            "redis://localhost:6379",
            "--cart-cleanup-interval-secs",
            "0",
        ]);

        assert!(result.is_err(), "a zero interval should be rejected");
    }

    #[test]
    fn blank_catalog_url_disables_the_catalog() -> TestResult {
        let config = ServerConfig::try_parse_from([
            "cartstore-json",
            "--redis-url",
            "redis://localhost:6379",
            "--catalog-url",
            " ",
        ])?;

        assert_eq!(config.carts.catalog(), None);

        Ok(())
    }
}
