//! Shared fixtures for unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use clementine_core::ProductId;
use rust_decimal::Decimal;

use crate::catalog::{CatalogError, Product, ProductSource};

/// Build a product with a price given in cents.
pub fn product(id: i64, price_cents: i64, title: &str) -> Product {
    Product {
        id: ProductId::new(id),
        title: title.to_string(),
        price: Decimal::new(price_cents, 2),
        image: format!("https://img.invalid/{id}.png"),
    }
}

/// In-memory `ProductSource` that counts remote lookups and can be told
/// to fail.
pub struct FixtureSource {
    products: Vec<Product>,
    offline: Vec<ProductId>,
    fail_next: AtomicUsize,
    calls: AtomicUsize,
}

impl FixtureSource {
    pub fn new(products: Vec<Product>) -> Self {
        Self {
            products,
            offline: Vec::new(),
            fail_next: AtomicUsize::new(0),
            calls: AtomicUsize::new(0),
        }
    }

    /// Make every lookup of `id` fail, permanently.
    pub fn with_offline(mut self, id: ProductId) -> Self {
        self.offline.push(id);
        self
    }

    /// Make the next `n` lookups fail, then recover.
    pub fn failing_next(self, n: usize) -> Self {
        self.fail_next.store(n, Ordering::SeqCst);
        self
    }

    /// Number of lookups that reached the source.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ProductSource for FixtureSource {
    async fn product(&self, id: ProductId) -> Result<Product, CatalogError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        // Yield so a second caller can arrive while this lookup is in flight.
        tokio::task::yield_now().await;

        if self
            .fail_next
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(CatalogError::Unavailable("fixture failure".to_string()));
        }
        if self.offline.contains(&id) {
            return Err(CatalogError::Unavailable("fixture offline".to_string()));
        }

        self.products
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or(CatalogError::NotFound(id))
    }

    async fn products(&self) -> Result<Vec<Product>, CatalogError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.products.clone())
    }
}
