//! Thin reqwest client for the auth endpoints.

use shared::{ApiError, AuthResponse, LoginRequest, RegisterRequest};
use std::fmt;

#[derive(Debug)]
pub enum AuthError {
    /// The server rejected the request; carries its message verbatim
    /// so the user sees what the server said.
    Rejected(String),
    Transport(reqwest::Error),
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::Rejected(message) => write!(f, "{}", message),
            AuthError::Transport(e) => write!(f, "auth service unreachable: {}", e),
        }
    }
}

impl std::error::Error for AuthError {}

impl From<reqwest::Error> for AuthError {
    fn from(e: reqwest::Error) -> Self {
        AuthError::Transport(e)
    }
}

pub struct AuthClient {
    http: reqwest::Client,
    base_url: String,
}

impl AuthClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// `POST /api/register` -> bearer token.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<String, AuthError> {
        self.request(
            "/api/register",
            &RegisterRequest {
                username: username.to_string(),
                email: email.to_string(),
                password: password.to_string(),
            },
        )
        .await
    }

    /// `POST /api/login` -> bearer token.
    pub async fn login(&self, email: &str, password: &str) -> Result<String, AuthError> {
        self.request(
            "/api/login",
            &LoginRequest {
                email: email.to_string(),
                password: password.to_string(),
            },
        )
        .await
    }

    async fn request<T: serde::Serialize>(&self, path: &str, body: &T) -> Result<String, AuthError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self.http.post(url).json(body).send().await?;

        if response.status().is_success() {
            let auth: AuthResponse = response.json().await?;
            return Ok(auth.token);
        }

        let error: ApiError = response.json().await.map_err(AuthError::Transport)?;
        Err(AuthError::Rejected(error.message))
    }
}
