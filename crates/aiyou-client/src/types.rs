//! Request and response types for the AI.YOU API.
//!
//! These types mirror the service's JSON contract. Field names follow the
//! service, which mixes `snake_case` (`expires_at`) and `camelCase`
//! (`assistantId`).

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Read `null` the same way as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ─────────────────────────────────────────────────────────────────────────────
// Auth
// ─────────────────────────────────────────────────────────────────────────────

/// Credentials posted to `/login`.
#[derive(Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Response to a successful login.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub token: String,
    #[serde(default)]
    pub expires_at: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Threads and messages
// ─────────────────────────────────────────────────────────────────────────────

/// Response carrying a newly created resource ID (thread or run).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreatedResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
}

/// Author of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body posted to `/v1/threads/{id}/messages`.
#[derive(Debug, Clone, Serialize)]
pub struct MessageRequest<'a> {
    pub role: Role,
    pub content: &'a str,
}

// ─────────────────────────────────────────────────────────────────────────────
// Runs
// ─────────────────────────────────────────────────────────────────────────────

/// Body posted to `/v1/threads/{id}/runs`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunRequest<'a> {
    pub assistant_id: &'a str,
}

/// Status of a run as reported by the service.
///
/// Anything other than the three terminal statuses is kept verbatim in
/// [`RunStatus::Pending`] and treated as "still working". A `null` status
/// reads as an empty pending status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum RunStatus {
    Completed,
    Failed,
    Cancelled,
    Pending(String),
}

impl RunStatus {
    /// Whether no further transition can happen from this status.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, RunStatus::Pending(_))
    }

    pub fn as_str(&self) -> &str {
        match self {
            RunStatus::Completed => "completed",
            RunStatus::Failed => "failed",
            RunStatus::Cancelled => "cancelled",
            RunStatus::Pending(raw) => raw,
        }
    }
}

impl Default for RunStatus {
    fn default() -> Self {
        RunStatus::Pending(String::new())
    }
}

impl From<String> for RunStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "completed" => RunStatus::Completed,
            "failed" => RunStatus::Failed,
            "cancelled" | "canceled" => RunStatus::Cancelled,
            _ => RunStatus::Pending(raw),
        }
    }
}

impl From<Option<String>> for RunStatus {
    fn from(raw: Option<String>) -> Self {
        raw.map(RunStatus::from).unwrap_or_default()
    }
}

impl From<RunStatus> for String {
    fn from(status: RunStatus) -> Self {
        match status {
            RunStatus::Pending(raw) => raw,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A run as returned by `/v1/threads/{id}/runs/{runId}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Run {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub status: RunStatus,
    /// Assistant reply; only meaningful once the run is completed.
    #[serde(default)]
    pub response: Option<String>,
}

impl Run {
    /// The reply text, empty when the service sent none.
    pub fn response_text(&self) -> &str {
        self.response.as_deref().unwrap_or_default()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Assistants
// ─────────────────────────────────────────────────────────────────────────────

/// Function exposed by an assistant tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolFunction {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub input_schema: serde_json::Map<String, serde_json::Value>,
}

/// A tool attached to an assistant.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tool {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub function: ToolFunction,
}

/// Assistant metadata from `/v1/assistants/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantInfo {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub assistant_id: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub active_script: bool,
    #[serde(default)]
    pub tools: Vec<Tool>,
    #[serde(default)]
    pub voice: String,
}
