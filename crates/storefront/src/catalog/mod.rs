//! Memoizing catalog client.
//!
//! # Architecture
//!
//! - One remote data source per catalog, behind the [`ProductSource`] seam
//! - In-memory caching via `moka`, keyed by product id
//! - The cache is session-scoped: unbounded and without TTL, because the
//!   catalog is small and entries live until the session ends
//!
//! Concurrent lookups for the same uncached id are coalesced into a
//! single remote request (single-flight). Failures are never cached; the
//! next recompute retries naturally.

mod source;
mod types;

pub use source::{HttpSource, ProductSource};
pub use types::Product;

use std::sync::Arc;

use clementine_core::ProductId;
use moka::future::Cache;
use thiserror::Error;
use tracing::{debug, instrument};

/// Errors that can occur when resolving catalog records.
///
/// Clonable so a single failed lookup can be handed to every coalesced
/// waiter.
#[derive(Debug, Clone, Error)]
pub enum CatalogError {
    /// The remote source is unreachable or answered with a failure status.
    #[error("catalog unreachable: {0}")]
    Unavailable(String),

    /// The remote source answered with a payload that does not decode.
    #[error("malformed catalog payload: {0}")]
    Malformed(String),

    /// The catalog has no record for this id.
    #[error("product not found: {0}")]
    NotFound(ProductId),
}

impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        Self::Unavailable(err.to_string())
    }
}

/// Client for the product catalog.
///
/// Cheaply cloneable handle; clones share the source and the cache.
pub struct Catalog<S> {
    inner: Arc<CatalogInner<S>>,
}

impl<S> Clone for Catalog<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct CatalogInner<S> {
    source: S,
    cache: Cache<ProductId, Product>,
}

impl<S: ProductSource> Catalog<S> {
    /// Create a new catalog client over `source`.
    #[must_use]
    pub fn new(source: S) -> Self {
        Self {
            inner: Arc::new(CatalogInner {
                source,
                cache: Cache::builder().build(),
            }),
        }
    }

    /// Resolve a product record, fetching it at most once.
    ///
    /// Returns the cached record if present; otherwise issues one remote
    /// lookup, caches the result, and returns it. Concurrent calls for
    /// the same uncached id attach to the in-flight lookup instead of
    /// issuing their own.
    ///
    /// # Errors
    ///
    /// Returns a `CatalogError` when the lookup fails; the failure is not
    /// cached, so a later call retries.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn fetch_product(&self, id: ProductId) -> Result<Product, CatalogError> {
        if let Some(product) = self.inner.cache.get(&id).await {
            debug!("cache hit for product");
            return Ok(product);
        }

        self.inner
            .cache
            .try_get_with(id, self.inner.source.product(id))
            .await
            .map_err(|err| err.as_ref().clone())
    }

    /// Fetch the full product listing.
    ///
    /// Each returned record is also placed in the per-id cache, so a
    /// grid view followed by a cart view does not refetch products.
    ///
    /// # Errors
    ///
    /// Returns a `CatalogError` if the listing request fails.
    #[instrument(skip(self))]
    pub async fn fetch_all_products(&self) -> Result<Vec<Product>, CatalogError> {
        let products = self.inner.source.products().await?;
        for product in &products {
            self.inner.cache.insert(product.id, product.clone()).await;
        }
        Ok(products)
    }
}
