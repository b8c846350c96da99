//! Login against the remote auth endpoint
//!
//! Credentials are posted as JSON. A rejected login reports the server's own
//! `message` when it sends one, else a generic incorrect-credentials message.

use serde::Serialize;
use url::Url;

use crate::app::models::LoginResponse;
use crate::constants::{api, auth};
use crate::errors::{AuthError, AuthResult};

use super::http::HttpHandler;

/// Body of the login request
#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

/// Handles login operations
pub struct AuthHandler;

impl AuthHandler {
    /// Posts credentials and decodes the profile and token on success
    ///
    /// # Errors
    ///
    /// Returns `AuthError` if:
    /// - The request could not be sent
    /// - The server answered with a non-success status
    /// - The success body is not a profile with a token
    pub async fn authenticate(
        http: &HttpHandler,
        login_url: &Url,
        username: &str,
        password: &str,
    ) -> AuthResult<LoginResponse> {
        tracing::info!("Signing in as user: {}", username);

        let response = http
            .post_json(login_url, &LoginRequest { username, password })
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = Self::extract_error_message(&body)
                .unwrap_or_else(|| auth::INCORRECT_CREDENTIALS.to_string());
            tracing::warn!(
                "Login rejected for user {} (HTTP {}): {}",
                username,
                status.as_u16(),
                message
            );
            return Err(AuthError::Rejected { message });
        }

        let login: LoginResponse =
            serde_json::from_str(&body).map_err(|e| AuthError::InvalidResponse {
                reason: e.to_string(),
            })?;

        tracing::info!("Signed in as user: {}", login.profile.username);
        Ok(login)
    }

    /// Extracts a server-provided message from an error body
    fn extract_error_message(body: &str) -> Option<String> {
        let value: serde_json::Value = serde_json::from_str(body).ok()?;
        value
            .get(api::MESSAGE_FIELD)
            .and_then(|message| message.as_str())
            .map(str::trim)
            .filter(|message| !message.is_empty())
            .map(str::to_string)
    }
}
