//! Authentication handling for the Foodgram API.
//!
//! Foodgram issues opaque tokens from `/api/auth/token/login/` in exchange for
//! an email and password. Requests then carry `Authorization: Token <token>`.

use std::sync::Arc;

use anyhow::Result;
use reqwest::Client;
use tokio::sync::RwLock;

use crate::client::types::{AuthRequest, AuthToken};

/// Token storage shared between every client built from the same handle.
///
/// One MCP session owns one client, but all sessions of a server process
/// reuse the token obtained at startup through a clone of this handle.
#[derive(Clone, Default)]
pub struct SharedAuth {
    token: Arc<RwLock<Option<String>>>,
}

impl SharedAuth {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self) -> Option<String> {
        self.token.read().await.clone()
    }

    pub async fn set(&self, token: String) {
        *self.token.write().await = Some(token);
    }

    pub async fn is_set(&self) -> bool {
        self.token.read().await.is_some()
    }
}

/// # Foodgram Authentication Handler
///
/// Exchanges credentials for a token and formats the `Authorization` header.
#[derive(Clone)]
pub struct FoodgramAuth {
    base_url: String,
    client: Client,
    token: SharedAuth,
}

impl FoodgramAuth {
    pub fn with_shared(base_url: String, token: SharedAuth) -> Self {
        Self {
            base_url,
            client: Client::new(),
            token,
        }
    }

    pub async fn authenticate(&self, email: String, password: String) -> Result<()> {
        tracing::info!("Attempting authentication for user: {}", email);

        let auth_request = AuthRequest { email: email.clone(), password };
        let auth_url = format!("{}/api/auth/token/login/", self.base_url);

        tracing::debug!("Making authentication request to: {}", auth_url);

        let response = self
            .client
            .post(&auth_url)
            .json(&auth_request)
            .timeout(std::time::Duration::from_secs(10))
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Network error during authentication: {}", e);
                anyhow::anyhow!("Failed to connect to Foodgram server at {}: {}", self.base_url, e)
            })?;

        let status = response.status();
        tracing::debug!("Authentication response status: {}", status);

        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            tracing::error!("Authentication failed with status {}: {}", status, error_body);

            match status.as_u16() {
                400 => anyhow::bail!("Invalid credentials provided. Please check email and password."),
                401 => anyhow::bail!("Authentication failed: Invalid email or password"),
                404 => anyhow::bail!("Foodgram API endpoint not found. Check your base URL: {}", self.base_url),
                500..=599 => anyhow::bail!("Foodgram server error ({}): {}", status, error_body),
                _ => anyhow::bail!("Authentication failed with status {}: {}", status, error_body),
            }
        }

        let auth_token: AuthToken = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse authentication response: {}", e);
            anyhow::anyhow!("Invalid response from Foodgram server: {}", e)
        })?;

        tracing::debug!("Received token: {}", preview(&auth_token.auth_token));
        self.token.set(auth_token.auth_token).await;
        tracing::info!("Authentication successful for user: {}", email);

        Ok(())
    }

    pub async fn get_token(&self) -> Option<String> {
        self.token.get().await
    }

    pub async fn is_authenticated(&self) -> bool {
        self.token.is_set().await
    }

    pub async fn set_token(&self, token: String) {
        self.token.set(token).await;
    }

    pub fn shared(&self) -> SharedAuth {
        self.token.clone()
    }

    /// Header value for requests that need a user, failing when anonymous.
    pub async fn require_header(&self) -> Result<String> {
        match self.token.get().await {
            Some(token) => {
                tracing::debug!("Using authentication token: {}", preview(&token));
                Ok(format!("Token {}", token))
            }
            None => {
                tracing::warn!("Attempted to make authenticated request without a token");
                anyhow::bail!("Not authenticated - log in to use this page")
            }
        }
    }

    /// Header value for public endpoints, attached only when logged in.
    pub async fn optional_header(&self) -> Option<String> {
        self.token.get().await.map(|token| format!("Token {}", token))
    }
}

pub(crate) fn preview(token: &str) -> String {
    format!("{}...", token.chars().take(10).collect::<String>())
}
