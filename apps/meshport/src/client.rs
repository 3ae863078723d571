//! # Registry HTTP Client
//!
//! Sends an ingestion request to the registry and hands back the raw reply.

use crate::config::Config;
use meshport_core::primitives::REGISTER_ENDPOINT;
use meshport_core::{ImportError, IngestionRequest};
use reqwest::header::CONTENT_TYPE;

/// HTTP client for the model registry.
#[derive(Debug, Clone)]
pub struct RegistryClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl RegistryClient {
    /// Create a client for the registry at `base_url`.
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        }
    }

    /// Create a client from resolved configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.base_url(), config.auth.token.clone())
    }

    /// Full URL of the registration endpoint.
    pub fn register_url(&self) -> String {
        format!("{}{}", self.base_url, REGISTER_ENDPOINT)
    }

    /// POST the request and return the body of a 200 reply.
    ///
    /// Any other status, or a transport failure, is a `Request` error.
    pub async fn register(&self, request: &IngestionRequest) -> Result<Vec<u8>, ImportError> {
        let url = self.register_url();
        let body = request.to_json()?;
        let request_error = |reason: String| ImportError::Request {
            url: url.clone(),
            reason,
        };

        tracing::debug!(
            "POST {} ({} upload, {} bytes)",
            url,
            request.upload_type(),
            body.len()
        );

        let mut req = self
            .http
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .body(body);
        if let Some(ref token) = self.token {
            req = req.bearer_auth(token);
        }

        let resp = req.send().await.map_err(|e| request_error(e.to_string()))?;

        let status = resp.status();
        if status != reqwest::StatusCode::OK {
            let detail = resp.text().await.unwrap_or_default();
            let detail = detail.trim();
            return Err(request_error(if detail.is_empty() {
                format!("registry answered {status}")
            } else {
                format!("registry answered {status}: {detail}")
            }));
        }

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| request_error(format!("cannot read reply: {e}")))?;
        tracing::debug!("Registry replied with {} bytes", bytes.len());
        Ok(bytes.to_vec())
    }
}

// =============================================================================
// TESTS
// =============================================================================
