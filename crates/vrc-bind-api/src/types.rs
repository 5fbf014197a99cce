use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, PartialEq, Eq)]
/// Username/password pair sent as HTTP Basic credentials.
pub struct VrcCredentials {
    pub username: String,
    pub password: String,
}

impl VrcCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for VrcCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VrcCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Result of the password step of a VRChat login.
pub enum LoginOutcome {
    /// Password accepted, but a second factor must be submitted before a session is issued.
    TwoFactorRequired,
    /// Session issued; holds the raw `Set-Cookie` values of the response.
    Authenticated { cookies: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Subset of the `GET /auth/user` payload shown to chat users.
pub struct VrcProfile {
    pub display_name: String,
    #[serde(default)]
    pub current_avatar_thumbnail_image_url: String,
}

#[derive(Debug, Error)]
/// Failure taxonomy for VRChat API calls.
pub enum VrcApiError {
    #[error("vrchat returned status {status}: {}", .message.as_deref().unwrap_or("no error message"))]
    Upstream { status: u16, message: Option<String> },
    #[error("http error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl VrcApiError {
    /// Text suitable for a chat reply: the service's own message when it sent one.
    pub fn user_message(&self) -> String {
        match self {
            Self::Upstream {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => message.trim().to_string(),
            Self::Upstream { status, .. } => {
                format!("Request failed with status code {status}")
            }
            Self::Transport(error) => error.to_string(),
            Self::InvalidResponse(message) => message.clone(),
        }
    }
}

#[async_trait]
/// Trait contract for the VRChat authentication endpoints.
pub trait VrcAuthApi: Send + Sync {
    /// `POST /auth/user` with Basic credentials.
    async fn login(&self, credentials: &VrcCredentials) -> Result<LoginOutcome, VrcApiError>;

    /// `POST /auth/twofactor` with Basic credentials and `{"code": ...}`.
    /// Returns the raw `Set-Cookie` values of the issued session.
    async fn verify_two_factor(
        &self,
        credentials: &VrcCredentials,
        code: &str,
    ) -> Result<Vec<String>, VrcApiError>;

    /// `GET /auth/user` replaying a stored session.
    async fn current_user(&self, cookies: &[String]) -> Result<VrcProfile, VrcApiError>;
}

/// Builds a `Cookie` header value from stored `Set-Cookie` strings.
///
/// Attributes such as `Path` or `Expires` are dropped; only the leading
/// `name=value` pair of each cookie is replayed.
pub fn session_cookie_header(cookies: &[String]) -> String {
    cookies
        .iter()
        .filter_map(|cookie| cookie.split(';').next())
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .collect::<Vec<_>>()
        .join("; ")
}
