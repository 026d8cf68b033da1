//! CLI command handlers.

pub mod chat;
pub mod info;
pub mod interactive;
pub mod repl;

use std::path::PathBuf;
use std::time::Duration;

use aiyou_client::{AssistantClient, PollPolicy, Session, load_instruction_from_file};
use aiyou_config::{Credentials, DotEnv, Settings, resolve_assistant_id};
use anyhow::{Context as _, Result};

/// Shared context for all commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// Merged file settings.
    pub settings: Settings,
    /// Values from `./.env`.
    pub dotenv: DotEnv,
    /// `--assistant`, already merged with `AIYOU_ASSISTANT_ID`.
    pub assistant: Option<String>,
    /// `--base-url`, already merged with `AIYOU_BASE_URL`.
    pub base_url: Option<String>,
    pub instruction: Option<String>,
    pub instruction_file: Option<PathBuf>,
    pub show_assistant_info: bool,
    /// Output as JSON for scripting.
    pub json_output: bool,
    /// Suppress everything except the response itself.
    pub silent: bool,
}

/// An authenticated client.
pub struct Connection {
    pub client: AssistantClient,
    pub session: Session,
}

impl Context {
    /// System prompt for this invocation. The file wins over `--instruction`.
    pub fn instruction(&self) -> Result<String> {
        if let Some(ref path) = self.instruction_file {
            let text = load_instruction_from_file(path)?;
            tracing::debug!(path = %path.display(), chars = text.len(), "Loaded instruction file");
            return Ok(text);
        }
        Ok(self
            .instruction
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
            .to_string())
    }

    pub fn poll_policy(&self) -> PollPolicy {
        let defaults = PollPolicy::default();
        PollPolicy::new(
            self.settings.poll.max_attempts.unwrap_or(defaults.max_attempts),
            self.settings
                .poll
                .delay_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.delay),
        )
    }

    /// Where `/save` writes transcripts.
    pub fn transcript_dir(&self) -> PathBuf {
        self.settings.transcript.dir.clone().unwrap_or_default()
    }

    /// Build an unauthenticated client from flags, environment and settings.
    pub fn build_client(&self) -> Result<AssistantClient> {
        let assistant_id =
            resolve_assistant_id(self.assistant.as_deref(), &self.dotenv, &self.settings)?;

        let mut builder = AssistantClient::builder()
            .assistant_id(assistant_id)
            .poll_policy(self.poll_policy());
        if let Some(url) = self.base_url.as_ref().or(self.settings.api.base_url.as_ref()) {
            builder = builder.base_url(url.clone());
        }
        if let Some(secs) = self.settings.api.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(builder.build()?)
    }

    /// Resolve credentials, log in, and print assistant info when asked.
    pub async fn connect(&self) -> Result<Connection> {
        let credentials = Credentials::resolve(&self.dotenv)?;
        let client = self.build_client()?;

        tracing::info!(assistant_id = client.assistant_id(), "Logging in to AI.YOU");
        let session = client
            .auth()
            .login(&credentials.email, &credentials.password)
            .await
            .context("Could not log in to AI.YOU")?;
        tracing::info!("Login successful");

        if self.show_assistant_info {
            match client.assistants().info(&session).await {
                Ok(info) => info::log_assistant_info(&info),
                Err(e) => tracing::error!(error = %e, "Failed to fetch assistant info"),
            }
        }

        Ok(Connection { client, session })
    }
}
