//! Catalog payload types.

use clementine_core::ProductId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A product record from the remote catalog.
///
/// Immutable once fetched; owned by the catalog cache. The remote payload
/// carries more fields (category, description, rating) but the cart client
/// depends only on these four, so the rest is ignored on deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Catalog identifier.
    pub id: ProductId,
    /// Display title.
    pub title: String,
    /// Unit price. The API sends a JSON number.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Product image URL.
    pub image: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_deserializes_numeric_price() {
        let json = r#"{
            "id": 1,
            "title": "Backpack",
            "price": 109.95,
            "description": "ignored",
            "category": "ignored",
            "image": "https://example.invalid/1.png",
            "rating": { "rate": 3.9, "count": 120 }
        }"#;
        let product: Product = serde_json::from_str(json).expect("deserialize");
        assert_eq!(product.id, ProductId::new(1));
        assert_eq!(product.price, Decimal::new(10995, 2));
        assert_eq!(product.title, "Backpack");
    }
}
