//! Threads API.

use serde_json::json;

use crate::client::AssistantClient;
use crate::error::{Error, Result};
use crate::session::Session;
use crate::types::{CreatedResponse, MessageRequest, Role};

/// Threads API client.
pub struct ThreadsApi {
    client: AssistantClient,
}

impl ThreadsApi {
    pub(crate) fn new(client: AssistantClient) -> Self {
        Self { client }
    }

    /// Create a new remote thread and return its ID.
    ///
    /// Every call creates a distinct thread.
    pub async fn create(&self, session: &Session) -> Result<String> {
        tracing::debug!("Creating thread");

        let response: CreatedResponse = self
            .client
            .post("/v1/threads", &json!({}), Some(session))
            .await
            .map_err(|e| Error::Thread(Box::new(e)))?;

        if response.id.is_empty() {
            return Err(Error::Thread(Box::new(Error::MissingField { field: "id" })));
        }

        tracing::debug!(thread_id = %response.id, "Thread created");
        Ok(response.id)
    }

    /// Post a user message to a thread.
    ///
    /// The acknowledgment body is not inspected; success is the status alone.
    pub async fn add_message(&self, session: &Session, thread_id: &str, content: &str) -> Result<()> {
        tracing::debug!(thread_id, "Adding message");

        let body = MessageRequest {
            role: Role::User,
            content,
        };
        self.client
            .post_raw(&format!("/v1/threads/{}/messages", thread_id), &body, Some(session))
            .await
            .map_err(|e| Error::Message {
                thread_id: thread_id.to_string(),
                source: Box::new(e),
            })?;

        tracing::debug!(thread_id, "Message added");
        Ok(())
    }
}
