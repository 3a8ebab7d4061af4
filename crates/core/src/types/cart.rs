//! The persisted cart multiset.
//!
//! A cart is an ordered sequence of product IDs where duplicates encode
//! quantity: the number of occurrences of an ID is the quantity of that
//! product. Only occurrence counts matter for correctness; the order is
//! whatever insertion produced.

use serde::{Deserialize, Serialize};

use crate::types::id::ProductId;

/// Multiset of selected product IDs, one entry per unit of quantity.
///
/// This is the sole persisted entity of the cart client. It serializes
/// transparently as a JSON array of IDs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart(Vec<ProductId>);

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Create a cart from a sequence of IDs.
    #[must_use]
    pub fn from_ids(ids: Vec<ProductId>) -> Self {
        Self(ids)
    }

    /// Total number of units in the cart (the count badge value).
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the cart holds no units at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Append one unit of `id`.
    pub fn push(&mut self, id: ProductId) {
        self.0.push(id);
    }

    /// Delete every occurrence of `id`.
    pub fn remove_all(&mut self, id: ProductId) {
        self.0.retain(|entry| *entry != id);
    }

    /// Delete the first occurrence of `id`; no-op if absent.
    pub fn decrement_one(&mut self, id: ProductId) {
        if let Some(index) = self.0.iter().position(|entry| *entry == id) {
            self.0.remove(index);
        }
    }

    /// Number of units of `id` in the cart.
    #[must_use]
    pub fn quantity(&self, id: ProductId) -> u32 {
        u32::try_from(self.0.iter().filter(|entry| **entry == id).count()).unwrap_or(u32::MAX)
    }

    /// Distinct IDs in first-seen order.
    #[must_use]
    pub fn distinct(&self) -> Vec<ProductId> {
        let mut seen = Vec::new();
        for id in &self.0 {
            if !seen.contains(id) {
                seen.push(*id);
            }
        }
        seen
    }

    /// Iterate over every unit entry.
    pub fn iter(&self) -> impl Iterator<Item = ProductId> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<ProductId> for Cart {
    fn from_iter<I: IntoIterator<Item = ProductId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
