//! Typed CRUD operations for the product entity.
//!
//! The gateway performs no validation of its own (that happens in the form
//! layer before it is called) and propagates transport failures unchanged.

use std::sync::Arc;

use crate::error::ApiError;
use crate::transport::Transport;
use crate::types::{NewProduct, Product};

/// Collection endpoint; the backend expects the trailing slash.
pub const PRODUCTS_PATH: &str = "/products/";

pub struct ProductGateway {
    transport: Arc<Transport>,
}

impl ProductGateway {
    pub fn new(transport: Arc<Transport>) -> Self {
        Self { transport }
    }

    /// Fetch the full collection, in backend order.
    pub async fn list(&self) -> Result<Vec<Product>, ApiError> {
        self.transport.get(PRODUCTS_PATH).await
    }

    /// Create a product; the returned value carries the server-assigned id.
    pub async fn create(&self, input: &NewProduct) -> Result<Product, ApiError> {
        self.transport.post(PRODUCTS_PATH, input).await
    }

    /// Delete a product by id. The backend echoes the deleted entity; an
    /// unknown id surfaces as `ApiError::Request` with status 404.
    pub async fn remove(&self, id: i64) -> Result<Product, ApiError> {
        self.transport.delete(&format!("/products/{id}")).await
    }
}
