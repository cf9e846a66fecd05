//! Trait abstraction for the CEP service to enable mocking in tests

use super::client::{AddressLookupResult, CepError};
use async_trait::async_trait;

/// Postal-code lookup service
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CepLookup: Send + Sync {
    /// Resolve a CEP (masked or digits only) into an address
    async fn lookup(&self, cep: &str) -> Result<AddressLookupResult, CepError>;
}
