//! Main client implementation.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::api::{AssistantsApi, AuthApi, RunsApi, ThreadsApi};
use crate::error::{Error, Result};
use crate::instruction::with_instruction;
use crate::poll::{PollPolicy, Sleeper, TokioSleeper};
use crate::session::Session;
use crate::transport::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT, HttpTransport, Transport};

/// AI.YOU API client.
///
/// Bound to one assistant for its whole lifetime. Every operation after
/// login takes the [`Session`] returned by [`AuthApi::login`].
///
/// # Example
///
/// ```no_run
/// use aiyou_client::AssistantClient;
///
/// # async fn example() -> aiyou_client::Result<()> {
/// let client = AssistantClient::builder().assistant_id("asst_123").build()?;
///
/// let session = client.auth().login("me@example.com", "secret").await?;
/// let reply = client.chat(&session, "Hello", "").await?;
/// println!("{}", reply);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct AssistantClient {
    inner: Arc<ClientInner>,
}

/// Inner client state (shared across clones).
pub(crate) struct ClientInner {
    pub(crate) transport: Arc<dyn Transport>,
    pub(crate) sleeper: Arc<dyn Sleeper>,
    pub(crate) assistant_id: String,
    pub(crate) poll: PollPolicy,
}

impl AssistantClient {
    /// Get access to the inner client state (for API implementations).
    pub(crate) fn inner(&self) -> &ClientInner {
        &self.inner
    }

    /// Create a new client builder.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Identifier of the assistant this client talks to.
    pub fn assistant_id(&self) -> &str {
        &self.inner.assistant_id
    }

    /// Poll budget used while waiting for runs.
    pub fn poll_policy(&self) -> PollPolicy {
        self.inner.poll
    }

    // ─────────────────────────────────────────────────────────────────────────
    // API accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// Access the login API.
    pub fn auth(&self) -> AuthApi {
        AuthApi::new(self.clone())
    }

    /// Access the threads API.
    pub fn threads(&self) -> ThreadsApi {
        ThreadsApi::new(self.clone())
    }

    /// Access the runs API.
    pub fn runs(&self) -> RunsApi {
        RunsApi::new(self.clone())
    }

    /// Access the assistants API.
    pub fn assistants(&self) -> AssistantsApi {
        AssistantsApi::new(self.clone())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Exchanges
    // ─────────────────────────────────────────────────────────────────────────

    /// Run one full exchange in a fresh thread.
    ///
    /// The input is trimmed and, when `instruction` is non-empty, suffixed with
    /// it before posting. The first failing step's error is returned as is.
    pub async fn chat(&self, session: &Session, input: &str, instruction: &str) -> Result<String> {
        let thread_id = self.threads().create(session).await?;
        let content = with_instruction(input.trim(), instruction);
        let response = self.chat_in_thread(session, &thread_id, &content).await?;
        tracing::debug!(thread_id = %thread_id, chars = response.len(), "Chat exchange complete");
        Ok(response)
    }

    /// Run one exchange in an existing thread: post, start a run, wait.
    pub async fn chat_in_thread(
        &self,
        session: &Session,
        thread_id: &str,
        input: &str,
    ) -> Result<String> {
        self.threads().add_message(session, thread_id, input).await?;
        let run_id = self.runs().create(session, thread_id).await?;
        self.runs()
            .wait_for_completion(session, thread_id, &run_id)
            .await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internal request helpers
    // ─────────────────────────────────────────────────────────────────────────

    /// POST a JSON body and return the raw response body.
    pub(crate) async fn post_raw<B>(
        &self,
        endpoint: &str,
        body: &B,
        session: Option<&Session>,
    ) -> Result<String>
    where
        B: Serialize + ?Sized,
    {
        let body = serde_json::to_value(body)?;
        self.inner
            .transport
            .call(Method::POST, endpoint, Some(&body), session)
            .await
    }

    /// POST a JSON body and decode the response.
    pub(crate) async fn post<T, B>(
        &self,
        endpoint: &str,
        body: &B,
        session: Option<&Session>,
    ) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let raw = self.post_raw(endpoint, body, session).await?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// POST without a body and decode the response.
    pub(crate) async fn post_empty<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        session: Option<&Session>,
    ) -> Result<T> {
        let raw = self
            .inner
            .transport
            .call(Method::POST, endpoint, None, session)
            .await?;
        Ok(serde_json::from_str(&raw)?)
    }
}

/// Builder for creating an [`AssistantClient`].
pub struct ClientBuilder {
    assistant_id: Option<String>,
    base_url: String,
    timeout: Duration,
    user_agent: Option<String>,
    poll: PollPolicy,
    transport: Option<Arc<dyn Transport>>,
    sleeper: Option<Arc<dyn Sleeper>>,
}

impl ClientBuilder {
    /// Create a new builder with defaults.
    pub fn new() -> Self {
        Self {
            assistant_id: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: None,
            poll: PollPolicy::default(),
            transport: None,
            sleeper: None,
        }
    }

    /// Set the assistant to talk to (required).
    pub fn assistant_id(mut self, id: impl Into<String>) -> Self {
        self.assistant_id = Some(id.into());
        self
    }

    /// Set the base URL for the API. Ignored when a custom transport is set.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the request timeout. Ignored when a custom transport is set.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set a custom user agent. Ignored when a custom transport is set.
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Set the poll budget used while waiting for runs.
    pub fn poll_policy(mut self, poll: PollPolicy) -> Self {
        self.poll = poll;
        self
    }

    /// Use a custom transport instead of HTTP.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Use a custom sleeper between polls.
    pub fn sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = Some(sleeper);
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<AssistantClient> {
        let assistant_id = self
            .assistant_id
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| Error::Config("assistant_id is required".to_string()))?;

        if self.poll.max_attempts == 0 {
            return Err(Error::Config(
                "poll max_attempts must be at least 1".to_string(),
            ));
        }

        let transport: Arc<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => {
                let mut builder = HttpTransport::builder()
                    .base_url(self.base_url)
                    .timeout(self.timeout);
                if let Some(agent) = self.user_agent {
                    builder = builder.user_agent(agent);
                }
                Arc::new(builder.build()?)
            }
        };

        tracing::debug!(assistant_id = %assistant_id, "Created AI.YOU client");

        Ok(AssistantClient {
            inner: Arc::new(ClientInner {
                transport,
                sleeper: self.sleeper.unwrap_or_else(|| Arc::new(TokioSleeper)),
                assistant_id,
                poll: self.poll,
            }),
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
