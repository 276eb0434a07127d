//! # Foodgram MCP Library
//!
//! Client-side presentation layer for a Foodgram recipe-sharing site, exposed
//! to AI assistants through the Model Context Protocol (MCP).
//!
//! ## Client Module
//!
//! The [`client`] module is a direct HTTP client for the Foodgram REST API:
//! recipe listings, tags, favorites, the shopping cart and subscriptions.
//!
//! ## View-model and pages
//!
//! [`view_model`] owns the state of a recipe listing (page, total, tag
//! filters) and turns user actions into API calls. [`pages`] builds the
//! Recipes, Favorites, Shopping list, author and Subscriptions pages on top of
//! it and renders them into serializable views. [`navigation`] lists the routes.
//!
//! ## Server Module
//!
//! The [`server`] module implements an MCP server whose tools open pages and
//! act on them, returning the rendered page after each action.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use mcp_foodgram::{FoodgramClient, FoodgramMcpServer, Navigation, OrdersCounter};
//!
//! // Use the client directly
//! let client = FoodgramClient::new("http://localhost:8000".to_string());
//!
//! // Or create an MCP server session
//! let server = FoodgramMcpServer::new(
//!     client,
//!     Arc::new(Navigation::default()),
//!     OrdersCounter::default(),
//! );
//! ```

pub mod client;
pub mod config;
pub mod navigation;
pub mod pages;
pub mod server;
pub mod view_model;

pub use client::FoodgramClient;
pub use navigation::Navigation;
pub use server::FoodgramMcpServer;
pub use view_model::{OrdersCounter, RecipeListViewModel};
