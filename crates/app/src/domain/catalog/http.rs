//! HTTP product catalog client.

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};

use crate::domain::catalog::{CatalogError, ProductCatalog, models::CatalogProduct};

/// Configuration for connecting to the product catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpProductCatalogConfig {
    /// Catalog base address, e.g. `"http://catalog:8080"`.
    pub base_url: String,
}

/// Product catalog reached over HTTP.
///
/// Listings are fetched from `GET {base_url}/products/{product_id}/skus/{sku}`.
#[derive(Debug, Clone)]
pub struct HttpProductCatalog {
    base_url: Url,
    http: Client,
}

impl HttpProductCatalog {
    /// Create a new client from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when the base URL cannot be parsed.
    pub fn new(config: &HttpProductCatalogConfig) -> Result<Self, CatalogError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|error| CatalogError::InvalidUrl(format!("{}: {error}", config.base_url)))?;

        if base_url.cannot_be_a_base() {
            return Err(CatalogError::InvalidUrl(config.base_url.clone()));
        }

        Ok(Self {
            base_url,
            http: Client::new(),
        })
    }

    fn listing_url(&self, product_id: &str, sku: &str) -> Result<Url, CatalogError> {
        let mut url = self.base_url.clone();

        url.path_segments_mut()
            .map_err(|()| CatalogError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(["products", product_id, "skus", sku]);

        Ok(url)
    }
}

#[async_trait]
impl ProductCatalog for HttpProductCatalog {
    async fn lookup(
        &self,
        product_id: &str,
        sku: &str,
    ) -> Result<Option<CatalogProduct>, CatalogError> {
        let url = self.listing_url(product_id, sku)?;

        let response = self.http.get(url).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();

            return Err(CatalogError::UnexpectedResponse(format!(
                "lookup of {product_id}/{sku} failed with status {status}: {text}"
            )));
        }

        Ok(Some(response.json().await?))
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use rust_decimal::Decimal;
    use testresult::TestResult;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path},
    };

    use super::*;

    fn catalog(server: &MockServer) -> Result<HttpProductCatalog, CatalogError> {
        HttpProductCatalog::new(&HttpProductCatalogConfig {
            base_url: server.uri(),
        })
    }

    #[tokio::test]
    async fn lookup_parses_listing() -> TestResult {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/products/prod1/skus/SKU1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "price": "19.99",
                "available": true,
                "stock": 4
            })))
            .expect(1)
            .mount(&server)
            .await;

        let listing = catalog(&server)?.lookup("prod1", "SKU1").await?;

        assert_eq!(
            listing,
            Some(CatalogProduct {
                price: Decimal::from_str("19.99")?,
                available: true,
                stock: Some(4),
            })
        );

        Ok(())
    }

    #[tokio::test]
    async fn missing_fields_default_to_available_and_untracked() -> TestResult {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/products/prod1/skus/SKU1"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "price": "5" })),
            )
            .mount(&server)
            .await;

        let listing = catalog(&server)?
            .lookup("prod1", "SKU1")
            .await?
            .ok_or("listing should be present")?;

        assert!(listing.available);
        assert_eq!(listing.stock, None);
        assert!(listing.can_fulfil(1_000));

        Ok(())
    }

    #[tokio::test]
    async fn not_found_is_none() -> TestResult {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        assert_eq!(catalog(&server)?.lookup("gone", "SKU").await?, None);

        Ok(())
    }

    #[tokio::test]
    async fn server_error_is_unexpected_response() -> TestResult {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503).set_body_string("down"))
            .mount(&server)
            .await;

        let result = catalog(&server)?.lookup("prod1", "SKU1").await;

        assert!(
            matches!(result, Err(CatalogError::UnexpectedResponse(ref message)) if message.contains("503")),
            "expected UnexpectedResponse, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn path_segments_are_escaped() -> TestResult {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/products/a%2Fb/skus/c%20d"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        catalog(&server)?.lookup("a/b", "c d").await?;

        Ok(())
    }

    #[test]
    fn rejects_unparseable_base_url() {
        let result = HttpProductCatalog::new(&HttpProductCatalogConfig {
            base_url: "not a url".to_string(),
        });

        assert!(matches!(result, Err(CatalogError::InvalidUrl(_))));
    }
}
