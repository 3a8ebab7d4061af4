//! Where product records come from.
//!
//! `ProductSource` is the seam between the memoizing catalog and the
//! remote API: production uses [`HttpSource`] against the Fake Store
//! REST endpoints, tests substitute an in-memory fixture.

use clementine_core::ProductId;
use serde::de::DeserializeOwned;
use url::Url;

use super::CatalogError;
use super::types::Product;

/// Supplier of product records.
// Send bounds are not needed: lookups run on the caller's task.
#[allow(async_fn_in_trait)]
pub trait ProductSource {
    /// Fetch a single product record.
    async fn product(&self, id: ProductId) -> Result<Product, CatalogError>;

    /// Fetch the full product listing for the browse/grid view.
    async fn products(&self) -> Result<Vec<Product>, CatalogError>;
}

/// REST client for the remote catalog API.
///
/// Consumes `GET {base}/products` and `GET {base}/products/{id}`.
/// There is no timeout or cancellation layer; a stalled lookup stalls
/// only the recomputation that awaits it.
pub struct HttpSource {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpSource {
    /// Create a new catalog source rooted at `base_url`.
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    fn endpoint(&self, path: &str) -> Result<Url, CatalogError> {
        self.base_url
            .join(path)
            .map_err(|e| CatalogError::Unavailable(e.to_string()))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, CatalogError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Unavailable(format!("HTTP {status}")));
        }

        // Read the body as text first for better error diagnostics
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(200).collect::<String>(),
                "failed to parse catalog response"
            );
            CatalogError::Malformed(e.to_string())
        })
    }
}

impl ProductSource for HttpSource {
    async fn product(&self, id: ProductId) -> Result<Product, CatalogError> {
        let url = self.endpoint(&format!("products/{id}"))?;
        // The API answers an unknown id with a null body rather than a 404.
        let record: Option<Product> = self.get_json(url).await?;
        record.ok_or(CatalogError::NotFound(id))
    }

    async fn products(&self) -> Result<Vec<Product>, CatalogError> {
        let url = self.endpoint("products")?;
        self.get_json(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_against_base() {
        let source = HttpSource::new(Url::parse("https://fakestoreapi.com/").expect("url"));
        let url = source.endpoint("products/3").expect("join");
        assert_eq!(url.as_str(), "https://fakestoreapi.com/products/3");
    }
}
