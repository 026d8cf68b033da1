//! Client error types.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::RunStatus;

/// Client error type.
///
/// Transport-level failures (`Transport`, `InvalidUrl`, `Api`, `Decode`) are
/// wrapped by the protocol operation that hit them, so the outer variant names
/// the step and the identifiers involved while [`std::error::Error::source`]
/// leads to the underlying failure.
#[derive(Debug, Error)]
pub enum Error {
    /// Request could not be built or sent, or the body could not be read.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing failed.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Server answered with a status other than 200 or 201.
    #[error("API error (status {status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// JSON encoding or decoding failed.
    #[error("malformed JSON: {0}")]
    Decode(#[from] serde_json::Error),

    /// A required field was missing or empty in a response.
    #[error("response is missing '{field}'")]
    MissingField {
        /// Name of the field.
        field: &'static str,
    },

    /// Login failed.
    #[error("login failed")]
    Auth(#[source] Box<Error>),

    /// Thread creation failed.
    #[error("failed to create thread")]
    Thread(#[source] Box<Error>),

    /// Posting a message failed.
    #[error("failed to add message to thread {thread_id}")]
    Message {
        thread_id: String,
        #[source]
        source: Box<Error>,
    },

    /// Starting a run failed.
    #[error("failed to create run in thread {thread_id}")]
    RunCreation {
        thread_id: String,
        #[source]
        source: Box<Error>,
    },

    /// Fetching run status failed.
    #[error("failed to retrieve run {run_id} in thread {thread_id}")]
    RunRetrieval {
        thread_id: String,
        run_id: String,
        #[source]
        source: Box<Error>,
    },

    /// The service reported the run as failed or cancelled.
    #[error("run {run_id} ended with status '{status}'")]
    RunFailed { run_id: String, status: RunStatus },

    /// The run did not reach a terminal status within the poll budget.
    #[error("timed out waiting for run {run_id} after {attempts} attempts")]
    RunTimeout { run_id: String, attempts: u32 },

    /// An instruction file could not be read.
    #[error("failed to read instruction file '{}'", path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Fetching assistant metadata failed.
    #[error("failed to fetch info for assistant {assistant_id}")]
    InfoFetch {
        assistant_id: String,
        #[source]
        source: Box<Error>,
    },

    /// Invalid client configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// HTTP status code of the API error at the root of this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => Some(*status),
            Error::Transport(e) => e.status().map(|s| s.as_u16()),
            Error::Auth(inner) | Error::Thread(inner) => inner.status(),
            Error::Message { source, .. }
            | Error::RunCreation { source, .. }
            | Error::RunRetrieval { source, .. }
            | Error::InfoFetch { source, .. } => source.status(),
            _ => None,
        }
    }

    /// Check if this is an authentication error.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Error::Auth(_)) || self.status() == Some(401)
    }

    /// Check if polling gave up before the run finished.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::RunTimeout { .. })
    }

    /// Check if the service reported the run as failed or cancelled.
    pub fn is_run_failure(&self) -> bool {
        matches!(self, Error::RunFailed { .. })
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, Error>;
