//! # Foodgram HTTP Client
//!
//! This module provides a direct HTTP client for the Foodgram API: recipe
//! listings with tag filters, favorites, the shopping cart and subscriptions.
//!
//! ## Modules
//!
//! - [`auth`] - Token login and the shared token handle
//! - [`client`] - Main HTTP client implementation with all API methods
//! - [`api`] - Backend traits the view-models are written against
//! - [`types`] - Type definitions for API requests and responses
//!
//! ## Quick Start
//!
//! ```no_run
//! use mcp_foodgram::client::{FoodgramClient, RecipeQuery};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = FoodgramClient::new("http://localhost:8000".to_string());
//!
//! client.authenticate("cook@example.com".to_string(), "password".to_string()).await?;
//!
//! let query = RecipeQuery { is_favorited: true, ..Default::default() };
//! let favorites = client.get_recipes(&query).await?;
//! println!("Found {} favorite recipes", favorites.count);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod auth;
#[allow(clippy::module_inception)]
pub mod client;
pub mod types;

pub use api::{FoodgramBackend, RecipeApi, SubscriptionApi};
pub use auth::SharedAuth;
pub use client::FoodgramClient;
pub use types::*;
