//! Trait abstraction for the REST API to enable mocking in tests

use super::client::ApiError;
use crate::state::{
    City, Client, ClientPayload, LookupItem, LookupKind, Product, ProductPayload, Supplier,
    SupplierPayload,
};
use async_trait::async_trait;
use std::path::Path;

/// Persistence operations the screens rely on
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BackendApi: Send + Sync {
    /// List all clients
    async fn list_clients(&self) -> Result<Vec<Client>, ApiError>;

    /// Fetch one client
    async fn get_client(&self, id: &str) -> Result<Client, ApiError>;

    /// Create a client
    async fn create_client(&self, payload: &ClientPayload) -> Result<Client, ApiError>;

    /// Update a client
    async fn update_client(&self, id: &str, payload: &ClientPayload) -> Result<Client, ApiError>;

    /// Delete a client
    async fn delete_client(&self, id: &str) -> Result<(), ApiError>;

    /// List all suppliers
    async fn list_suppliers(&self) -> Result<Vec<Supplier>, ApiError>;

    /// Fetch one supplier
    async fn get_supplier(&self, id: &str) -> Result<Supplier, ApiError>;

    /// Create a supplier
    async fn create_supplier(&self, payload: &SupplierPayload) -> Result<Supplier, ApiError>;

    /// Update a supplier
    async fn update_supplier(
        &self,
        id: &str,
        payload: &SupplierPayload,
    ) -> Result<Supplier, ApiError>;

    /// Delete a supplier
    async fn delete_supplier(&self, id: &str) -> Result<(), ApiError>;

    /// Flip a supplier between active and inactive
    async fn toggle_supplier_status(&self, id: &str) -> Result<(), ApiError>;

    /// Replace a supplier's logo with the file at `file`
    async fn upload_supplier_logo(&self, id: &str, file: &Path) -> Result<Supplier, ApiError>;

    /// List all products
    async fn list_products(&self) -> Result<Vec<Product>, ApiError>;

    /// Fetch one product
    async fn get_product(&self, id: &str) -> Result<Product, ApiError>;

    /// Create a product
    async fn create_product(&self, payload: &ProductPayload) -> Result<Product, ApiError>;

    /// Update a product
    async fn update_product(&self, id: &str, payload: &ProductPayload)
        -> Result<Product, ApiError>;

    /// Delete a product
    async fn delete_product(&self, id: &str) -> Result<(), ApiError>;

    /// Replace a product's image with the file at `file`
    async fn upload_product_image(&self, id: &str, file: &Path) -> Result<Product, ApiError>;

    /// List the cities address forms select from
    async fn list_cities(&self) -> Result<Vec<City>, ApiError>;

    /// List brands, models, categories or manufacturers
    async fn list_lookup(&self, kind: LookupKind) -> Result<Vec<LookupItem>, ApiError>;
}
