use anyhow::{Context, Result};
use base64::prelude::*;
use log::{debug, error};
use reqwest::{Client, StatusCode, header::AUTHORIZATION};
use std::time::Duration;
use url::Url;

pub const AUTH_FAILED_MESSAGE: &str = "Authentication failed. Please try again.";
pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Please check your connection.";

/// Result of a login attempt against the device
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    Authenticated,
    Rejected(StatusCode),
    NetworkError(String),
}

impl AuthOutcome {
    /// Message to show the user, `None` on success
    pub fn user_message(&self) -> Option<&'static str> {
        match self {
            AuthOutcome::Authenticated => None,
            AuthOutcome::Rejected(_) => Some(AUTH_FAILED_MESSAGE),
            AuthOutcome::NetworkError(_) => Some(NETWORK_ERROR_MESSAGE),
        }
    }
}

impl From<AuthOutcome> for Result<(), String> {
    fn from(outcome: AuthOutcome) -> Self {
        match outcome.user_message() {
            None => Ok(()),
            Some(message) => Err(message.to_string()),
        }
    }
}

/// `Basic` authorization header value for `user:pass`
pub fn basic_auth_header(user: &str, pass: &str) -> String {
    format!("Basic {}", BASE64_STANDARD.encode(format!("{user}:{pass}")))
}

/// HTTP client for the device's basic-auth endpoint
#[derive(Clone)]
pub struct AuthClient {
    client: Client,
    auth_url: Url,
}

impl AuthClient {
    pub fn new(auth_url: Url, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to create auth http client")?;

        Ok(Self { client, auth_url })
    }

    /// GET the auth endpoint with a `Basic` header; HTTP 200 means success
    pub async fn authenticate(&self, user: &str, pass: &str) -> AuthOutcome {
        debug!("authenticate() called for user {user}");

        let response = self
            .client
            .get(self.auth_url.clone())
            .header(AUTHORIZATION, basic_auth_header(user, pass))
            .send()
            .await;

        match response {
            Ok(response) if response.status() == StatusCode::OK => AuthOutcome::Authenticated,
            Ok(response) => {
                error!("authenticate: device answered {}", response.status());
                AuthOutcome::Rejected(response.status())
            }
            Err(e) => {
                error!("authenticate: {e}");
                AuthOutcome::NetworkError(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_auth_header() {
        assert_eq!(basic_auth_header("admin", "secret"), "Basic YWRtaW46c2VjcmV0");
        assert_eq!(basic_auth_header("", ""), "Basic Og==");
    }

    #[test]
    fn test_outcome_messages() {
        assert_eq!(AuthOutcome::Authenticated.user_message(), None);
        assert_eq!(
            AuthOutcome::Rejected(StatusCode::UNAUTHORIZED).user_message(),
            Some(AUTH_FAILED_MESSAGE)
        );
        assert_eq!(
            Result::<(), String>::from(AuthOutcome::NetworkError("refused".to_string())),
            Err(NETWORK_ERROR_MESSAGE.to_string())
        );
    }
}
