//! Process configuration read from environment variables.

use std::net::SocketAddr;

use anyhow::{Context, Result};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3001";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Foodgram backend, without the `/api` suffix
    pub base_url: String,
    /// Login used for every session; anonymous when absent
    pub credentials: Option<Credentials>,
    pub bind_addr: SocketAddr,
}

#[derive(Clone, PartialEq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Config {
    /// `FOODGRAM_BASE_URL`, `FOODGRAM_EMAIL`, `FOODGRAM_PASSWORD`, `BIND_ADDR`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let base_url = lookup("FOODGRAM_BASE_URL")
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        // Blank values count as unset
        let email = lookup("FOODGRAM_EMAIL").filter(|email| !email.trim().is_empty());
        let password = lookup("FOODGRAM_PASSWORD").filter(|password| !password.is_empty());
        let credentials = match (email, password) {
            (Some(email), Some(password)) => Some(Credentials { email, password }),
            (Some(_), None) => anyhow::bail!("FOODGRAM_EMAIL is set but FOODGRAM_PASSWORD is not"),
            (None, Some(_)) => anyhow::bail!("FOODGRAM_PASSWORD is set but FOODGRAM_EMAIL is not"),
            (None, None) => None,
        };

        let bind = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind
            .parse()
            .with_context(|| format!("BIND_ADDR is not a socket address: {}", bind))?;

        Ok(Self {
            base_url,
            credentials,
            bind_addr,
        })
    }
}
