//! Line items and cart totals.
//!
//! Joins the persisted cart against catalog records. A product that
//! cannot be resolved right now is excluded from the sum and reported in
//! [`CartTotal::unpriced`], while the item stays in the cart so the next
//! recompute retries it.

use clementine_core::{Cart, ProductId};
use rust_decimal::Decimal;
use tracing::warn;

use crate::catalog::{Catalog, CatalogError, Product, ProductSource};

/// Derived per-product display row.
#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
    /// The resolved product record.
    pub product: Product,
    /// Units of this product in the cart.
    pub quantity: u32,
    /// `quantity * price`, at full decimal precision.
    pub subtotal: Decimal,
}

/// Result of totalling a cart.
#[derive(Debug, Clone, PartialEq)]
pub struct CartTotal {
    /// Sum of subtotals over every distinct product that resolved.
    pub total: Decimal,
    /// Products that could not be resolved and are excluded from `total`.
    ///
    /// Distinguishes "catalog down" from "cart genuinely empty": a
    /// non-empty `unpriced` means `total` understates the cart.
    pub unpriced: Vec<ProductId>,
}

impl CartTotal {
    /// True when every distinct product in the cart was priced.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.unpriced.is_empty()
    }
}

/// Computes line items and totals for a cart.
pub struct PricingEngine<S> {
    catalog: Catalog<S>,
}

impl<S: ProductSource> PricingEngine<S> {
    /// Create an engine over `catalog`.
    #[must_use]
    pub fn new(catalog: Catalog<S>) -> Self {
        Self { catalog }
    }

    /// The catalog this engine resolves products through.
    #[must_use]
    pub fn catalog(&self) -> &Catalog<S> {
        &self.catalog
    }

    /// Compute the line item for `id` in `cart`.
    ///
    /// # Errors
    ///
    /// Returns a `CatalogError` when the product cannot be resolved.
    pub async fn line_item(&self, cart: &Cart, id: ProductId) -> Result<LineItem, CatalogError> {
        let product = self.catalog.fetch_product(id).await?;
        let quantity = cart.quantity(id);
        let subtotal = product.price * Decimal::from(quantity);
        Ok(LineItem {
            product,
            quantity,
            subtotal,
        })
    }

    /// Total the cart over its distinct products.
    ///
    /// The sum is order-independent. Individual lookup failures never
    /// fail the aggregate; each failed id is logged and reported in
    /// [`CartTotal::unpriced`].
    pub async fn cart_total(&self, cart: &Cart) -> CartTotal {
        let mut total = Decimal::ZERO;
        let mut unpriced = Vec::new();

        for id in cart.distinct() {
            match self.line_item(cart, id).await {
                Ok(line) => total += line.subtotal,
                Err(err) => {
                    warn!(%id, error = %err, "excluding product from cart total");
                    unpriced.push(id);
                }
            }
        }

        CartTotal { total, unpriced }
    }
}
