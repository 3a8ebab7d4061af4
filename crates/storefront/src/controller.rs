//! Command dispatch and the checkout flow.
//!
//! The controller is the only component that mutates the cart store.
//! Every UI action arrives as a discrete [`Command`]; the controller
//! applies it and re-derives the display state (count badge, line
//! items, total). The checkout flow is a small state machine:
//!
//! ```text
//! Browsing -> Reviewing -> FormValid -> Confirmed -> Cleared
//! ```

use clementine_core::ProductId;
use clementine_core::money::format_eur;
use rust_decimal::Decimal;
use tracing::{instrument, warn};

use crate::catalog::{Catalog, HttpSource, ProductSource};
use crate::config::StorefrontConfig;
use crate::error::{CartError, Result};
use crate::pricing::{LineItem, PricingEngine};
use crate::storage::{CartStore, JsonFileStore, KeyValueStore};
use crate::validation::{DeliveryForm, validate};

/// A discrete cart mutation produced by a UI action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Add one unit from the product grid.
    AddItem(ProductId),
    /// The "+" control on a line item.
    Increment(ProductId),
    /// The "-" control on a line item; no-op when absent.
    Decrement(ProductId),
    /// The "X" control: delete every unit of the product.
    RemoveItem(ProductId),
    /// The "Empty cart" control.
    EmptyCart,
}

/// Position in the shopping flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
    /// Product grid; the cart view has not been opened.
    Browsing,
    /// Cart view open; mutations and the delivery form are accepted.
    Reviewing,
    /// Delivery form accepted against a non-empty cart.
    FormValid,
    /// Receipt produced but the cart not yet destroyed. Transient within
    /// [`CartController::confirm_order`].
    Confirmed,
    /// Checkout completed and the cart destroyed.
    Cleared,
}

// =============================================================================
// Derived View Types
// =============================================================================

/// Derived display state of the cart.
#[derive(Debug, Clone, PartialEq)]
pub struct CartSummary {
    /// Total units in the cart (the count badge).
    pub item_count: usize,
    /// One row per distinct resolvable product.
    pub lines: Vec<LineItem>,
    /// Sum of line subtotals.
    pub total: Decimal,
    /// Products excluded from `total` because they did not resolve.
    pub unpriced: Vec<ProductId>,
}

impl CartSummary {
    /// Whether the cart holds no units; the line-item display clears.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.item_count == 0
    }

    /// The total rendered to two decimal places.
    #[must_use]
    pub fn formatted_total(&self) -> String {
        format_eur(self.total)
    }
}

/// One receipt row.
#[derive(Debug, Clone, PartialEq)]
pub struct ReceiptLine {
    pub quantity: u32,
    pub title: String,
    /// `quantity * price` for this product.
    pub amount: Decimal,
}

impl core::fmt::Display for ReceiptLine {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{}x {} - {}",
            self.quantity,
            self.title,
            format_eur(self.amount)
        )
    }
}

/// The outcome of a completed checkout.
#[derive(Debug, Clone, PartialEq)]
pub struct Receipt {
    /// Name captured from the delivery form.
    pub customer_name: String,
    /// One row per distinct product, in cart order.
    pub lines: Vec<ReceiptLine>,
    /// Grand total over all rows.
    pub total: Decimal,
}

impl Receipt {
    /// The grand total rendered to two decimal places.
    #[must_use]
    pub fn formatted_total(&self) -> String {
        format_eur(self.total)
    }
}

// =============================================================================
// CartController
// =============================================================================

/// Mediates UI commands onto the store, catalog, and pricing engine.
pub struct CartController<K, S> {
    store: CartStore<K>,
    pricing: PricingEngine<S>,
    state: FlowState,
    delivery: Option<DeliveryForm>,
}

impl CartController<JsonFileStore, HttpSource> {
    /// Wire up a controller from configuration: file-backed storage and
    /// the remote catalog API.
    #[must_use]
    pub fn from_config(config: &StorefrontConfig) -> Self {
        let store = CartStore::new(JsonFileStore::new(config.cart_path.clone()));
        let catalog = Catalog::new(HttpSource::new(config.catalog_url.clone()));
        Self::new(store, catalog)
    }
}

impl<K: KeyValueStore, S: ProductSource> CartController<K, S> {
    /// Create a controller over `store` and `catalog`.
    #[must_use]
    pub fn new(store: CartStore<K>, catalog: Catalog<S>) -> Self {
        Self {
            store,
            pricing: PricingEngine::new(catalog),
            state: FlowState::Browsing,
            delivery: None,
        }
    }

    /// Current position in the shopping flow.
    #[must_use]
    pub fn state(&self) -> FlowState {
        self.state
    }

    /// The catalog, for the product-grid collaborator.
    #[must_use]
    pub fn catalog(&self) -> &Catalog<S> {
        self.pricing.catalog()
    }

    /// The count badge: total units in the persisted cart.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.store.load().len()
    }

    /// Enter the cart view and recompute everything from the persisted
    /// cart.
    pub async fn open_cart(&mut self) -> CartSummary {
        self.state = FlowState::Reviewing;
        self.delivery = None;
        self.summary().await
    }

    /// Apply a cart mutation and re-derive the display state.
    ///
    /// Accepted whenever the cart is mutable. A mutation while the
    /// delivery form was already accepted drops the flow back to
    /// `Reviewing`, since the emptiness gate has to be re-checked.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` during `Confirmed`.
    #[instrument(skip(self))]
    pub async fn apply(&mut self, command: Command) -> Result<CartSummary> {
        match self.state {
            FlowState::Confirmed => {
                return Err(CartError::InvalidState { state: self.state });
            }
            FlowState::FormValid => {
                self.state = FlowState::Reviewing;
                self.delivery = None;
            }
            FlowState::Browsing | FlowState::Reviewing | FlowState::Cleared => {}
        }

        match command {
            Command::AddItem(id) | Command::Increment(id) => self.store.add(id),
            Command::Decrement(id) => self.store.decrement_one(id),
            Command::RemoveItem(id) => self.store.remove_all(id),
            Command::EmptyCart => self.store.clear(),
        }

        Ok(self.summary().await)
    }

    /// Submit the delivery form: `Reviewing -> FormValid`.
    ///
    /// # Errors
    ///
    /// Rejects with `ValidationRejected` when a field fails, with
    /// `EmptyCart` when there is nothing to check out, and with
    /// `InvalidState` outside `Reviewing`. No state is mutated on
    /// rejection.
    pub fn submit_delivery(&mut self, form: DeliveryForm) -> Result<()> {
        if self.state != FlowState::Reviewing {
            return Err(CartError::InvalidState { state: self.state });
        }

        validate(&form).map_err(CartError::ValidationRejected)?;
        if self.store.load().is_empty() {
            return Err(CartError::EmptyCart);
        }

        self.delivery = Some(form);
        self.state = FlowState::FormValid;
        Ok(())
    }

    /// Complete the checkout: `FormValid -> Confirmed -> Cleared`.
    ///
    /// Captures the submitter's name, produces the receipt, then
    /// destroys the cart; the count badge reads zero afterwards. The
    /// transition is one-shot and cannot be re-entered without a new
    /// cart.
    ///
    /// # Errors
    ///
    /// A failed product lookup aborts the checkout with nothing mutated
    /// and the flow still `FormValid`, so submission can be retried.
    #[instrument(skip(self))]
    pub async fn confirm_order(&mut self) -> Result<Receipt> {
        if self.state != FlowState::FormValid {
            return Err(CartError::InvalidState { state: self.state });
        }
        let Some(form) = self.delivery.clone() else {
            return Err(CartError::InvalidState { state: self.state });
        };

        let cart = self.store.load();
        if cart.is_empty() {
            // Another writer emptied the slot since the form was accepted
            self.state = FlowState::Reviewing;
            self.delivery = None;
            return Err(CartError::EmptyCart);
        }

        let mut lines = Vec::new();
        let mut total = Decimal::ZERO;
        for id in cart.distinct() {
            let line = self.pricing.line_item(&cart, id).await?;
            total += line.subtotal;
            lines.push(ReceiptLine {
                quantity: line.quantity,
                title: line.product.title,
                amount: line.subtotal,
            });
        }

        self.state = FlowState::Confirmed;
        let customer_name = form.name.trim().to_string();
        self.store.set_customer_name(&customer_name);

        self.store.clear();
        self.delivery = None;
        self.state = FlowState::Cleared;

        Ok(Receipt {
            customer_name,
            lines,
            total,
        })
    }

    /// The confirmation greeting, once a checkout has captured a name.
    #[must_use]
    pub fn confirmation_message(&self) -> Option<String> {
        self.store
            .customer_name()
            .map(|name| format!("Thank you for your order {name}!"))
    }

    /// Recompute the full display state from the persisted cart.
    pub async fn summary(&self) -> CartSummary {
        let cart = self.store.load();

        let mut resolved = Vec::new();
        let mut unpriced = Vec::new();
        for id in cart.distinct() {
            match self.pricing.catalog().fetch_product(id).await {
                Ok(product) => resolved.push(product),
                Err(err) => {
                    warn!(%id, error = %err, "product unavailable for cart view");
                    unpriced.push(id);
                }
            }
        }

        // The lookups above may have suspended; quantities must come from
        // the cart as persisted now, not from the pre-fetch snapshot.
        let cart = self.store.load();

        let mut lines = Vec::new();
        let mut total = Decimal::ZERO;
        for product in resolved {
            let quantity = cart.quantity(product.id);
            if quantity == 0 {
                continue;
            }
            let subtotal = product.price * Decimal::from(quantity);
            total += subtotal;
            lines.push(LineItem {
                product,
                quantity,
                subtotal,
            });
        }
        unpriced.retain(|id| cart.quantity(*id) > 0);

        CartSummary {
            item_count: cart.len(),
            lines,
            total,
            unpriced,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use crate::test_support::{FixtureSource, product};
    use crate::validation::Field;

    fn controller(source: FixtureSource) -> CartController<MemoryStore, FixtureSource> {
        CartController::new(CartStore::new(MemoryStore::new()), Catalog::new(source))
    }

    fn delivery_form() -> DeliveryForm {
        DeliveryForm {
            name: "Grace Hopper".to_string(),
            phone: "555-0100".to_string(),
            email: "grace@example.com".to_string(),
            street: "Navy Way 3".to_string(),
            zip: "12345".to_string(),
            city: "Arlington".to_string(),
        }
    }

    #[tokio::test]
    async fn test_open_cart_enters_reviewing() {
        let mut controller = controller(FixtureSource::new(vec![]));
        assert_eq!(controller.state(), FlowState::Browsing);

        let summary = controller.open_cart().await;
        assert_eq!(controller.state(), FlowState::Reviewing);
        assert!(summary.is_empty());
    }

    #[tokio::test]
    async fn test_add_from_the_grid_updates_the_badge() {
        let mut controller = controller(FixtureSource::new(vec![product(1, 1000, "Cap")]));

        let summary = controller
            .apply(Command::AddItem(ProductId::new(1)))
            .await
            .expect("apply");

        assert_eq!(controller.state(), FlowState::Browsing);
        assert_eq!(summary.item_count, 1);
        assert_eq!(controller.item_count(), 1);
    }

    #[tokio::test]
    async fn test_submit_delivery_requires_reviewing() {
        let mut controller = controller(FixtureSource::new(vec![]));

        let err = controller.submit_delivery(delivery_form()).expect_err("gate");
        assert!(matches!(
            err,
            CartError::InvalidState {
                state: FlowState::Browsing
            }
        ));
    }

    #[tokio::test]
    async fn test_submit_delivery_rejects_invalid_form_without_mutation() {
        let mut controller = controller(FixtureSource::new(vec![product(1, 1000, "Cap")]));
        controller
            .apply(Command::AddItem(ProductId::new(1)))
            .await
            .expect("apply");
        controller.open_cart().await;

        let mut form = delivery_form();
        form.zip = "12".to_string();

        let err = controller.submit_delivery(form).expect_err("must reject");
        match err {
            CartError::ValidationRejected(errors) => {
                assert!(errors.reason(Field::Zip).is_some());
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(controller.state(), FlowState::Reviewing);
        assert_eq!(controller.item_count(), 1);
    }

    #[tokio::test]
    async fn test_submit_delivery_rejects_empty_cart() {
        let mut controller = controller(FixtureSource::new(vec![]));
        controller.open_cart().await;

        let err = controller
            .submit_delivery(delivery_form())
            .expect_err("must reject");
        assert!(matches!(err, CartError::EmptyCart));
        assert_eq!(controller.state(), FlowState::Reviewing);
    }

    #[tokio::test]
    async fn test_mutation_after_form_acceptance_reopens_the_gate() {
        let mut controller = controller(FixtureSource::new(vec![product(1, 1000, "Cap")]));
        controller
            .apply(Command::AddItem(ProductId::new(1)))
            .await
            .expect("apply");
        controller.open_cart().await;
        controller.submit_delivery(delivery_form()).expect("submit");
        assert_eq!(controller.state(), FlowState::FormValid);

        controller
            .apply(Command::RemoveItem(ProductId::new(1)))
            .await
            .expect("apply");
        assert_eq!(controller.state(), FlowState::Reviewing);

        // The cart is empty again, so confirming is no longer reachable
        let err = controller.confirm_order().await.expect_err("gate");
        assert!(matches!(err, CartError::InvalidState { .. }));
    }

    #[tokio::test]
    async fn test_failed_receipt_lookup_leaves_checkout_retryable() {
        // Two failing lookups: one for the open_cart recompute (failures
        // are not cached) and one for the receipt itself
        let source = FixtureSource::new(vec![product(1, 1000, "Cap")]).failing_next(2);
        let store = CartStore::new(MemoryStore::new());
        store.add(ProductId::new(1));
        let mut controller = CartController::new(store, Catalog::new(source));

        let opened = controller.open_cart().await;
        assert_eq!(opened.unpriced, vec![ProductId::new(1)]);
        controller.submit_delivery(delivery_form()).expect("submit");

        let err = controller.confirm_order().await.expect_err("catalog down");
        assert!(matches!(err, CartError::Catalog(_)));
        assert_eq!(controller.state(), FlowState::FormValid);
        assert_eq!(controller.item_count(), 1);

        // The source recovered; the same submission now completes
        let receipt = controller.confirm_order().await.expect("retry");
        assert_eq!(receipt.total, Decimal::new(1000, 2));
        assert_eq!(controller.item_count(), 0);
    }

    #[test]
    fn test_receipt_line_rendering() {
        let line = ReceiptLine {
            quantity: 2,
            title: "Fleece Jacket".to_string(),
            amount: Decimal::new(2000, 2),
        };
        assert_eq!(line.to_string(), "2x Fleece Jacket - 20.00 €");
    }
}
