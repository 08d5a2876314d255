//! Domain DTOs for the inventory API.
//!
//! # Design
//! These types mirror the backend's schema but are defined independently of
//! the mock-server crate; integration tests catch schema drift. `id` is
//! assigned by the server and immutable once created, so `NewProduct` simply
//! omits it.

use serde::{Deserialize, Serialize};

/// A product as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub in_stock: bool,
}

/// Request payload for creating a product. The backend fills in `id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewProduct {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    #[serde(default = "default_in_stock")]
    pub in_stock: bool,
}

fn default_in_stock() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_roundtrips_through_json() {
        let product = Product {
            id: 3,
            name: "Widget".to_string(),
            description: "blue".to_string(),
            price: 9.99,
            in_stock: true,
        };
        let json = serde_json::to_string(&product).unwrap();
        let back: Product = serde_json::from_str(&json).unwrap();
        assert_eq!(back, product);
    }

    #[test]
    fn new_product_serializes_without_id() {
        let input = NewProduct {
            name: "Widget".to_string(),
            description: String::new(),
            price: 9.99,
            in_stock: true,
        };
        let json = serde_json::to_value(&input).unwrap();
        assert!(json.get("id").is_none());
        assert_eq!(json["name"], "Widget");
        assert_eq!(json["in_stock"], true);
    }

    #[test]
    fn new_product_defaults_apply_on_deserialize() {
        let input: NewProduct = serde_json::from_str(r#"{"name":"Widget","price":1.5}"#).unwrap();
        assert_eq!(input.description, "");
        assert!(input.in_stock);
    }
}
