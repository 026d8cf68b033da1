//! Runs API and the poll-to-completion loop.

use serde_json::json;

use crate::client::AssistantClient;
use crate::error::{Error, Result};
use crate::session::Session;
use crate::types::{CreatedResponse, Run, RunRequest, RunStatus};

/// Runs API client.
pub struct RunsApi {
    client: AssistantClient,
}

impl RunsApi {
    pub(crate) fn new(client: AssistantClient) -> Self {
        Self { client }
    }

    /// Start a run of the client's assistant over a thread and return its ID.
    pub async fn create(&self, session: &Session, thread_id: &str) -> Result<String> {
        tracing::debug!(thread_id, "Creating run");

        let wrap = |e: Error| Error::RunCreation {
            thread_id: thread_id.to_string(),
            source: Box::new(e),
        };

        let body = RunRequest {
            assistant_id: self.client.assistant_id(),
        };
        let response: CreatedResponse = self
            .client
            .post(&format!("/v1/threads/{}/runs", thread_id), &body, Some(session))
            .await
            .map_err(wrap)?;

        if response.id.is_empty() {
            return Err(wrap(Error::MissingField { field: "id" }));
        }

        tracing::debug!(thread_id, run_id = %response.id, "Run created");
        Ok(response.id)
    }

    /// Fetch the current state of a run.
    pub async fn retrieve(&self, session: &Session, thread_id: &str, run_id: &str) -> Result<Run> {
        let run: Run = self
            .client
            .post(
                &format!("/v1/threads/{}/runs/{}", thread_id, run_id),
                &json!({}),
                Some(session),
            )
            .await
            .map_err(|e| Error::RunRetrieval {
                thread_id: thread_id.to_string(),
                run_id: run_id.to_string(),
                source: Box::new(e),
            })?;

        tracing::debug!(thread_id, run_id, status = %run.status, "Run status retrieved");
        Ok(run)
    }

    /// Poll a run until it reaches a terminal status and return its reply.
    ///
    /// Checks at most `max_attempts` times with a fixed `delay` between checks
    /// and no pause after the last one. `completed` returns the response,
    /// `failed`/`cancelled` return [`Error::RunFailed`] at once, and running out
    /// of attempts returns [`Error::RunTimeout`]. A retrieval error ends polling.
    pub async fn wait_for_completion(
        &self,
        session: &Session,
        thread_id: &str,
        run_id: &str,
    ) -> Result<String> {
        let inner = self.client.inner();
        let policy = inner.poll;

        for attempt in 1..=policy.max_attempts {
            tracing::debug!(thread_id, run_id, attempt, "Checking run status");
            let run = self.retrieve(session, thread_id, run_id).await?;

            match run.status {
                RunStatus::Completed => {
                    tracing::debug!(thread_id, run_id, attempt, "Run completed");
                    return Ok(run.response.unwrap_or_default());
                }
                RunStatus::Failed | RunStatus::Cancelled => {
                    tracing::warn!(thread_id, run_id, status = %run.status, "Run did not complete");
                    return Err(Error::RunFailed {
                        run_id: run_id.to_string(),
                        status: run.status,
                    });
                }
                RunStatus::Pending(_) if attempt < policy.max_attempts => {
                    tracing::debug!(
                        thread_id,
                        run_id,
                        delay_ms = policy.delay.as_millis() as u64,
                        "Run still pending"
                    );
                    inner.sleeper.sleep(policy.delay).await;
                }
                RunStatus::Pending(_) => {}
            }
        }

        tracing::warn!(thread_id, run_id, attempts = policy.max_attempts, "Gave up waiting for run");
        Err(Error::RunTimeout {
            run_id: run_id.to_string(),
            attempts: policy.max_attempts,
        })
    }
}
