//! Scripted transport and sleeper for tests.

use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::Method;

use crate::error::{Error, Result};
use crate::poll::Sleeper;
use crate::session::Session;
use crate::transport::Transport;

/// One scripted transport outcome.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Accepted response with this raw body.
    Body(String),
    /// Rejected response with this status and body.
    Status(u16, String),
}

impl MockReply {
    pub fn json(value: serde_json::Value) -> Self {
        MockReply::Body(value.to_string())
    }

    pub fn raw(body: impl Into<String>) -> Self {
        MockReply::Body(body.into())
    }

    pub fn status(status: u16, body: impl Into<String>) -> Self {
        MockReply::Status(status, body.into())
    }
}

/// A request seen by [`MockTransport`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: Method,
    pub endpoint: String,
    pub body: Option<serde_json::Value>,
    /// Bearer token that would have been attached.
    pub token: Option<String>,
}

/// Transport that replays scripted replies in order and records every call.
///
/// Running out of replies is reported as a configuration error.
pub struct MockTransport {
    replies: Mutex<VecDeque<MockReply>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockTransport {
    pub fn new(replies: Vec<MockReply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// All calls made so far.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Number of calls whose endpoint equals `endpoint`.
    pub fn calls_to(&self, endpoint: &str) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|c| c.endpoint == endpoint)
            .count()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn call(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&serde_json::Value>,
        session: Option<&Session>,
    ) -> Result<String> {
        self.calls.lock().push(RecordedCall {
            method,
            endpoint: endpoint.to_string(),
            body: body.cloned(),
            token: session.map(|s| s.token().to_string()),
        });

        match self.replies.lock().pop_front() {
            Some(MockReply::Body(body)) => Ok(body),
            Some(MockReply::Status(status, body)) => Err(Error::Api { status, body }),
            None => Err(Error::Config(format!(
                "MockTransport: no reply scripted for {}",
                endpoint
            ))),
        }
    }
}

/// Sleeper that returns immediately and remembers each requested pause.
#[derive(Default)]
pub struct RecordingSleeper {
    sleeps: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().clone()
    }

    pub fn count(&self) -> usize {
        self.sleeps.lock().len()
    }

    /// Sum of all requested pauses.
    pub fn total(&self) -> Duration {
        self.sleeps.lock().iter().sum()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().push(duration);
    }
}
