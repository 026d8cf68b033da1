//! API endpoint implementations.

mod assistants;
mod auth;
mod runs;
mod threads;

pub use assistants::AssistantsApi;
pub use auth::AuthApi;
pub use runs::RunsApi;
pub use threads::ThreadsApi;
