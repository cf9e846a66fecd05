//! REST API client module

mod client;
mod traits;

pub use client::{ApiClient, ApiError, DEFAULT_BASE_URL};
pub use traits::BackendApi;

#[cfg(test)]
pub use traits::MockBackendApi;
