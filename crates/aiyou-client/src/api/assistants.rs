//! Assistants API.

use crate::client::AssistantClient;
use crate::error::{Error, Result};
use crate::session::Session;
use crate::types::AssistantInfo;

/// Assistants API client.
pub struct AssistantsApi {
    client: AssistantClient,
}

impl AssistantsApi {
    pub(crate) fn new(client: AssistantClient) -> Self {
        Self { client }
    }

    /// Fetch metadata for the client's assistant.
    pub async fn info(&self, session: &Session) -> Result<AssistantInfo> {
        let assistant_id = self.client.assistant_id();
        tracing::debug!(assistant_id, "Fetching assistant info");

        let info: AssistantInfo = self
            .client
            .post_empty(&format!("/v1/assistants/{}", assistant_id), Some(session))
            .await
            .map_err(|e| Error::InfoFetch {
                assistant_id: assistant_id.to_string(),
                source: Box::new(e),
            })?;

        tracing::debug!(assistant_id, name = %info.name, "Assistant info retrieved");
        Ok(info)
    }
}
