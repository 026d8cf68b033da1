//! Login API.

use crate::client::AssistantClient;
use crate::error::{Error, Result};
use crate::session::Session;
use crate::types::{LoginRequest, LoginResponse};

/// Login API client.
pub struct AuthApi {
    client: AssistantClient,
}

impl AuthApi {
    pub(crate) fn new(client: AssistantClient) -> Self {
        Self { client }
    }

    /// Exchange credentials for a [`Session`].
    ///
    /// This is the only call made without a bearer token.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session> {
        tracing::debug!("Sending login request");

        let response: LoginResponse = self
            .client
            .post("/login", &LoginRequest { email, password }, None)
            .await
            .map_err(|e| Error::Auth(Box::new(e)))?;

        if response.token.is_empty() {
            return Err(Error::Auth(Box::new(Error::MissingField { field: "token" })));
        }

        tracing::debug!(expires_at = ?response.expires_at, "Login accepted");
        Ok(Session::new(response.token, response.expires_at))
    }
}
