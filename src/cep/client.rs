//! HTTP client for the BrasilAPI CEP service

use super::traits::CepLookup;
use crate::mask;
use crate::state::null_as_empty;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Default lookup service
pub const DEFAULT_BASE_URL: &str = "https://brasilapi.com.br/api";

/// Address returned for a CEP
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressLookupResult {
    pub cep: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub state: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub city: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub neighborhood: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub street: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub service: String,
}

/// Errors from the CEP service
#[derive(Debug, Error)]
pub enum CepError {
    #[error("CEP must have 8 digits, got {0:?}")]
    InvalidCep(String),
    #[error("CEP {0} not found")]
    NotFound(String),
    #[error("CEP service returned HTTP {0}")]
    Status(u16),
    #[error("CEP request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Client for the BrasilAPI `cep/v1` endpoint
pub struct BrasilApiClient {
    client: Client,
    base_url: String,
}

impl BrasilApiClient {
    /// Create a client for `base_url` (e.g. `https://brasilapi.com.br/api`)
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, CepError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl CepLookup for BrasilApiClient {
    async fn lookup(&self, cep: &str) -> Result<AddressLookupResult, CepError> {
        let digits = mask::digits_only(cep);
        if digits.len() != 8 {
            return Err(CepError::InvalidCep(cep.to_string()));
        }

        let url = format!("{}/cep/v1/{}", self.base_url, digits);
        debug!("Looking up CEP {digits} at {url}");

        let response = self.client.get(&url).send().await?;
        match response.status() {
            StatusCode::NOT_FOUND => Err(CepError::NotFound(digits)),
            status if !status.is_success() => Err(CepError::Status(status.as_u16())),
            _ => Ok(response.json::<AddressLookupResult>().await?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn client_for(server: &MockServer) -> BrasilApiClient {
        BrasilApiClient::new(server.uri(), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_lookup_sends_digits_only() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/cep/v1/01310100"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "cep": "01310100",
                "state": "SP",
                "city": "São Paulo",
                "neighborhood": "Bela Vista",
                "street": "Avenida Paulista",
                "service": "viacep"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let result = client_for(&server).await.lookup("01310-100").await.unwrap();

        assert_eq!(result.city, "São Paulo");
        assert_eq!(result.street, "Avenida Paulista");
        assert_eq!(result.neighborhood, "Bela Vista");
        assert_eq!(result.state, "SP");
    }

    #[tokio::test]
    async fn test_lookup_accepts_null_street() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/cep/v1/13960000"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "cep": "13960000",
                "state": "SP",
                "city": "Socorro",
                "neighborhood": null,
                "street": null,
                "service": "correios"
            })))
            .mount(&server)
            .await;

        let result = client_for(&server).await.lookup("13960000").await.unwrap();
        assert_eq!(result.street, "");
        assert_eq!(result.neighborhood, "");
    }

    #[tokio::test]
    async fn test_lookup_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = client_for(&server).await.lookup("99999999").await.unwrap_err();
        assert!(matches!(err, CepError::NotFound(ref cep) if cep == "99999999"));
    }

    #[tokio::test]
    async fn test_lookup_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = client_for(&server).await.lookup("01310100").await.unwrap_err();
        assert!(matches!(err, CepError::Status(500)));
    }

    #[tokio::test]
    async fn test_short_cep_never_hits_the_network() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = client_for(&server).await.lookup("0131").await.unwrap_err();
        assert!(matches!(err, CepError::InvalidCep(_)));
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = BrasilApiClient::new("http://localhost:1/api/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url, "http://localhost:1/api");
    }
}
