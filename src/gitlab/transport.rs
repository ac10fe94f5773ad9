//! HTTP transport used by the GitLab gateway.
//!
//! The gateway only ever needs `GET url?query -> (status, body)`, so that is
//! the whole trait. [`ReqwestTransport`] attaches the `PRIVATE-TOKEN` header
//! and a request timeout; tests substitute scripted transports.

use std::time::Duration;

use async_trait::async_trait;
use http::StatusCode;
use http::header::RETRY_AFTER;
use reqwest::Client;
use tracing::debug;
use url::Url;

use super::error::IntakeError;
use super::locator::PersonalAccessToken;

const PRIVATE_TOKEN_HEADER: &str = "PRIVATE-TOKEN";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Status and body of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// Response status.
    pub status: StatusCode,
    /// Response body decoded as text.
    pub body: String,
    /// `Retry-After` hint in seconds, when the server sent one.
    pub retry_after_secs: Option<u64>,
}

impl HttpResponse {
    /// Builds a response without a retry hint.
    #[must_use]
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            retry_after_secs: None,
        }
    }
}

/// Minimal HTTP client abstraction.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Performs a `GET` request.
    ///
    /// Non-success statuses are returned as responses, not errors.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::Network`] when no response was received.
    async fn get(&self, url: &Url, query: &[(String, String)])
    -> Result<HttpResponse, IntakeError>;
}

/// Reqwest-backed transport authenticated with a personal access token.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    token: PersonalAccessToken,
}

impl ReqwestTransport {
    /// Builds a transport for the given token.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::Network`] when the HTTP client cannot be
    /// constructed (for example when TLS initialisation fails).
    pub fn new(token: PersonalAccessToken) -> Result<Self, IntakeError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|error| IntakeError::Network {
                message: format!("build client failed: {error}"),
            })?;
        Ok(Self { client, token })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(
        &self,
        url: &Url,
        query: &[(String, String)],
    ) -> Result<HttpResponse, IntakeError> {
        debug!(%url, ?query, "GET");
        let response = self
            .client
            .get(url.clone())
            .query(query)
            .header(PRIVATE_TOKEN_HEADER, self.token.value())
            .send()
            .await
            .map_err(|error| map_reqwest_error(&error))?;

        let status = response.status();
        let retry_after_secs = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse::<u64>().ok());
        let body = response
            .text()
            .await
            .map_err(|error| map_reqwest_error(&error))?;

        Ok(HttpResponse {
            status,
            body,
            retry_after_secs,
        })
    }
}

fn map_reqwest_error(error: &reqwest::Error) -> IntakeError {
    let message = if error.is_timeout() {
        format!("request timed out: {error}")
    } else {
        error.to_string()
    };
    IntakeError::Network { message }
}
