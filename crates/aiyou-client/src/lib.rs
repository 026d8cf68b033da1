//! Client for the AI.YOU assistant API.
//!
//! This crate implements the thread/run protocol of the hosted service: log in,
//! open a thread, post a message, start a run and poll it until it finishes.
//!
//! # Example
//!
//! ```no_run
//! use aiyou_client::{AssistantClient, Result};
//!
//! # async fn example() -> Result<()> {
//! let client = AssistantClient::builder()
//!     .assistant_id("asst_123")
//!     .build()?;
//!
//! let session = client.auth().login("me@example.com", "secret").await?;
//!
//! // One-shot exchange in a fresh thread
//! let reply = client.chat(&session, "Hello!", "Answer in French").await?;
//! println!("{}", reply);
//!
//! // Several exchanges sharing one thread
//! let thread_id = client.threads().create(&session).await?;
//! let first = client.chat_in_thread(&session, &thread_id, "Pick a number").await?;
//! let second = client.chat_in_thread(&session, &thread_id, "Double it").await?;
//! println!("{}\n{}", first, second);
//! # Ok(())
//! # }
//! ```
//!
//! # Polling
//!
//! [`RunsApi::wait_for_completion`](api::RunsApi::wait_for_completion) checks
//! a run at most [`PollPolicy::max_attempts`] times with a fixed delay between
//! checks. The pause goes through a [`Sleeper`], so tests can substitute
//! `mock::RecordingSleeper` (feature `testing`) and run without real delays.

pub mod api;
pub mod client;
pub mod error;
pub mod instruction;
#[cfg(any(test, feature = "testing"))]
pub mod mock;
pub mod poll;
pub mod session;
pub mod transport;
pub mod types;

pub use client::{AssistantClient, ClientBuilder};
pub use error::{Error, Result};
pub use instruction::{load_instruction_from_file, with_instruction};
pub use poll::{PollPolicy, Sleeper, TokioSleeper};
pub use session::Session;
pub use transport::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT, HttpTransport, Transport};
pub use types::*;
