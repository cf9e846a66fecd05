//! HTTP client for the management REST API
//!
//! Every entity is a plain JSON collection (`/client`, `/suppliers`,
//! `/products`) plus read-only lookup collections for the select fields.
//! Supplier logos and product images go up as multipart `PATCH` requests.

use super::traits::BackendApi;
use crate::state::{
    City, Client, ClientPayload, LookupItem, LookupKind, Product, ProductPayload, Supplier,
    SupplierPayload,
};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Default API address
pub const DEFAULT_BASE_URL: &str = "http://localhost:3333";

/// Errors returned by the REST API
#[derive(Debug, Error)]
pub enum ApiError {
    /// Non-2xx answer; `message` is the server's `error` field when present
    #[error("{message}")]
    Http { status: u16, message: String },
    #[error("Failed to reach the API: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("Unexpected response from the API: {0}")]
    Decode(#[source] reqwest::Error),
    /// Upload source that could not be read
    #[error("Could not read {path}: {source}")]
    File {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ApiError::Decode(e)
        } else {
            ApiError::Transport(e)
        }
    }
}

/// Client for the management REST API
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new API client
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        debug!("{method} {}{path}", self.base_url);
        self.client.request(method, format!("{}{}", self.base_url, path))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = check_status(self.request(Method::GET, path).send().await?).await?;
        Ok(response.json().await?)
    }

    async fn send_json<B, T>(&self, method: Method, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let response = check_status(self.request(method, path).json(body).send().await?).await?;
        Ok(response.json().await?)
    }

    async fn send_empty(&self, method: Method, path: &str) -> Result<(), ApiError> {
        check_status(self.request(method, path).send().await?).await?;
        Ok(())
    }

    /// PATCH `file` as the multipart field `field`
    async fn send_file<T: DeserializeOwned>(
        &self,
        path: &str,
        field: &'static str,
        file: &Path,
    ) -> Result<T, ApiError> {
        let bytes = tokio::fs::read(file)
            .await
            .map_err(|source| ApiError::File {
                path: file.display().to_string(),
                source,
            })?;
        let file_name = file
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| field.to_string());
        debug!("Uploading {file_name} ({} bytes) as {field}", bytes.len());

        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(content_type(file))?;
        let form = Form::new().part(field, part);

        let response =
            check_status(self.request(Method::PATCH, path).multipart(form).send().await?).await?;
        Ok(response.json().await?)
    }
}

/// Content type announced for an uploaded file, from its extension
fn content_type(file: &Path) -> &'static str {
    let extension = file
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase());
    match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

/// Turn non-2xx responses into `ApiError::Http`
async fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));

    warn!("API request failed with {status}: {message}");
    Err(ApiError::Http {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl BackendApi for ApiClient {
    async fn list_clients(&self) -> Result<Vec<Client>, ApiError> {
        self.get_json("/client").await
    }

    async fn get_client(&self, id: &str) -> Result<Client, ApiError> {
        self.get_json(&format!("/client/{id}")).await
    }

    async fn create_client(&self, payload: &ClientPayload) -> Result<Client, ApiError> {
        self.send_json(Method::POST, "/client", payload).await
    }

    async fn update_client(&self, id: &str, payload: &ClientPayload) -> Result<Client, ApiError> {
        self.send_json(Method::PUT, &format!("/client/{id}"), payload)
            .await
    }

    async fn delete_client(&self, id: &str) -> Result<(), ApiError> {
        self.send_empty(Method::DELETE, &format!("/client/{id}"))
            .await
    }

    async fn list_suppliers(&self) -> Result<Vec<Supplier>, ApiError> {
        self.get_json("/suppliers").await
    }

    async fn get_supplier(&self, id: &str) -> Result<Supplier, ApiError> {
        self.get_json(&format!("/suppliers/{id}")).await
    }

    async fn create_supplier(&self, payload: &SupplierPayload) -> Result<Supplier, ApiError> {
        self.send_json(Method::POST, "/suppliers", payload).await
    }

    async fn update_supplier(
        &self,
        id: &str,
        payload: &SupplierPayload,
    ) -> Result<Supplier, ApiError> {
        self.send_json(Method::PUT, &format!("/suppliers/{id}"), payload)
            .await
    }

    async fn delete_supplier(&self, id: &str) -> Result<(), ApiError> {
        self.send_empty(Method::DELETE, &format!("/suppliers/{id}"))
            .await
    }

    async fn toggle_supplier_status(&self, id: &str) -> Result<(), ApiError> {
        self.send_empty(Method::PATCH, &format!("/suppliers/{id}/status"))
            .await
    }

    async fn upload_supplier_logo(&self, id: &str, file: &Path) -> Result<Supplier, ApiError> {
        self.send_file(&format!("/suppliers/{id}/logo"), "logo", file)
            .await
    }

    async fn list_products(&self) -> Result<Vec<Product>, ApiError> {
        self.get_json("/products").await
    }

    async fn get_product(&self, id: &str) -> Result<Product, ApiError> {
        self.get_json(&format!("/products/{id}")).await
    }

    async fn create_product(&self, payload: &ProductPayload) -> Result<Product, ApiError> {
        self.send_json(Method::POST, "/products", payload).await
    }

    async fn update_product(
        &self,
        id: &str,
        payload: &ProductPayload,
    ) -> Result<Product, ApiError> {
        self.send_json(Method::PUT, &format!("/products/{id}"), payload)
            .await
    }

    async fn delete_product(&self, id: &str) -> Result<(), ApiError> {
        self.send_empty(Method::DELETE, &format!("/products/{id}"))
            .await
    }

    async fn upload_product_image(&self, id: &str, file: &Path) -> Result<Product, ApiError> {
        self.send_file(&format!("/products/{id}/image"), "image", file)
            .await
    }

    async fn list_cities(&self) -> Result<Vec<City>, ApiError> {
        self.get_json("/city").await
    }

    async fn list_lookup(&self, kind: LookupKind) -> Result<Vec<LookupItem>, ApiError> {
        self.get_json(kind.path()).await
    }
}
