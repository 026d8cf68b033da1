//! JSON-over-HTTP transport.
//!
//! The [`Transport`] trait is the seam between the conversation protocol and
//! the network. [`HttpTransport`] is the reqwest implementation; tests swap in
//! [`MockTransport`](crate::mock::MockTransport).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Method;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use url::Url;

use crate::error::{Error, Result};
use crate::session::Session;

/// Base URL of the hosted AI.YOU API.
pub const DEFAULT_BASE_URL: &str = "https://ai.dragonflygroup.fr/api";

/// Default timeout for requests.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Performs one JSON request and returns the raw response body.
///
/// Implementations attach `Authorization: Bearer <token>` if and only if a
/// session is given, accept only 200 and 201 as success, and never retry.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn call(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&serde_json::Value>,
        session: Option<&Session>,
    ) -> Result<String>;
}

/// reqwest-backed [`Transport`].
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    base_url: Url,
    timeout: Duration,
}

impl HttpTransport {
    /// Create a new transport builder.
    pub fn builder() -> HttpTransportBuilder {
        HttpTransportBuilder::new()
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build a URL for an API endpoint.
    pub(crate) fn url(&self, endpoint: &str) -> Result<Url> {
        let endpoint = endpoint.trim_start_matches('/');
        self.base_url.join(endpoint).map_err(Error::from)
    }
}

/// Whether a status counts as success for this API.
fn is_accepted(status: u16) -> bool {
    status == 200 || status == 201
}

#[async_trait]
impl Transport for HttpTransport {
    async fn call(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&serde_json::Value>,
        session: Option<&Session>,
    ) -> Result<String> {
        let url = self.url(endpoint)?;
        tracing::debug!(%method, %url, authenticated = session.is_some(), "Sending request");

        let mut request = self
            .http
            .request(method.clone(), url)
            .timeout(self.timeout);
        if let Some(body) = body {
            request = request.json(body);
        }
        if let Some(session) = session {
            request = request.bearer_auth(session.token());
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let text = response.text().await?;
        tracing::debug!(%method, endpoint, status, bytes = text.len(), "Received response");
        tracing::trace!(body = %text, "Response body");

        if !is_accepted(status) {
            tracing::warn!(%method, endpoint, status, "API returned an error status");
            return Err(Error::Api { status, body: text });
        }

        Ok(text)
    }
}

/// Builder for creating an [`HttpTransport`].
#[derive(Debug)]
pub struct HttpTransportBuilder {
    base_url: String,
    timeout: Duration,
    user_agent: Option<String>,
}

impl HttpTransportBuilder {
    /// Create a new builder pointing at the hosted API.
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: None,
        }
    }

    /// Set the base URL for the API.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set a custom user agent.
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Build the transport.
    pub fn build(self) -> Result<HttpTransport> {
        // Trailing slash so `join` appends endpoints instead of replacing the last segment
        let mut base_url = Url::parse(&self.base_url)?;
        if !base_url.path().ends_with('/') {
            base_url.set_path(&format!("{}/", base_url.path()));
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let user_agent = self
            .user_agent
            .unwrap_or_else(|| format!("aiyou-client/{}", env!("CARGO_PKG_VERSION")));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(user_agent)
            .build()?;

        Ok(HttpTransport {
            http,
            base_url,
            timeout: self.timeout,
        })
    }
}

impl Default for HttpTransportBuilder {
    fn default() -> Self {
        Self::new()
    }
}
