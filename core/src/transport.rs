//! Execution of `HttpRequest` values over the network.
//!
//! # Design
//! `Transport` is the only place I/O happens. Everything it returns is plain
//! data, so status interpretation stays in `TodoClient::parse_*`. A transport
//! never retries and never inspects status codes.

use async_trait::async_trait;
use tracing::debug;

use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Executes one HTTP round-trip.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Returns the response for any status code. Fails only when no response
    /// could be obtained (`NetworkError`) or it could not be read
    /// (`InvalidResponse`).
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

/// `reqwest`-backed transport.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: reqwest::Client,
}

impl ReqwestTransport {
    /// # Errors
    /// Returns error if the underlying HTTP client cannot be constructed.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(ApiError::network)?;
        Ok(Self { http })
    }

    pub fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let method = match request.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self.http.request(method, request.url.as_str());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(ApiError::network)?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response.text().await.map_err(|e| {
            debug!(error = %e, "failed to read response body");
            ApiError::InvalidResponse
        })?;

        debug!(method = request.method.as_str(), url = %request.url, status, "request settled");
        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
