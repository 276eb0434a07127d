//! Type definitions for the Foodgram API.
//!
//! This module contains the data structures exchanged with the Foodgram backend:
//! recipes, tags, authors and subscriptions, plus the query used to request a
//! filtered page of recipes.
//!
//! ## Key Types
//!
//! - [`Recipe`] - Full recipe as returned by the listing and detail endpoints
//! - [`Tag`] - Server-defined category label used as a list filter
//! - [`TagFilter`] - A [`Tag`] with the client-only `value` ("filter active") flag
//! - [`RecipeQuery`] - Parameters for `GET /api/recipes/`
//! - [`PaginatedResponse`] - Standard API response wrapper for lists

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fixed number of recipes shown on one listing page.
pub const PAGE_SIZE: u32 = 6;

/// Token login response from `/api/auth/token/login/`.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthToken {
    pub auth_token: String,
}

/// Credentials payload for token login. Foodgram logs users in by email.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthRequest {
    pub email: String,
    pub password: String,
}

/// A server-defined category label attachable to recipes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: i32,
    pub name: String,
    /// HEX colour used by the UI, e.g. `#E26C2D`
    #[serde(default)]
    pub color: Option<String>,
    pub slug: String,
}

/// A tag as held by a listing page: the server representation plus the
/// client-only `value` flag that marks the filter as active.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagFilter {
    #[serde(flatten)]
    pub tag: Tag,
    pub value: bool,
}

impl TagFilter {
    pub fn active(tag: Tag) -> Self {
        Self { tag, value: true }
    }

    pub fn slug(&self) -> &str {
        &self.tag.slug
    }
}

/// Recipe author as embedded in recipes and subscription entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub id: i32,
    #[serde(default)]
    pub email: Option<String>,
    pub username: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub is_subscribed: bool,
}

impl Author {
    /// "First Last" when both are known, the username otherwise.
    pub fn display_name(&self) -> String {
        match (self.first_name.as_deref(), self.last_name.as_deref()) {
            (Some(first), Some(last)) if !first.is_empty() || !last.is_empty() => {
                format!("{} {}", first, last).trim().to_string()
            }
            _ => self.username.clone(),
        }
    }
}

/// Ingredient line of a recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeIngredient {
    pub id: i32,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i32,
}

/// A recipe as returned by `GET /api/recipes/`.
///
/// `name` is the recipe title. `is_favorited` and `is_in_shopping_cart` are
/// computed per user by the server and are always `false` for anonymous
/// requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: i32,
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub cooking_time: Option<i32>,
    #[serde(default)]
    pub author: Option<Author>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub ingredients: Vec<RecipeIngredient>,
    #[serde(default)]
    pub is_favorited: bool,
    #[serde(default)]
    pub is_in_shopping_cart: bool,
    #[serde(default)]
    pub pub_date: Option<DateTime<Utc>>,
}

/// Abbreviated recipe returned by the favorite and shopping cart endpoints
/// and embedded in subscription entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShortRecipe {
    pub id: i32,
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub cooking_time: Option<i32>,
}

/// A followed author together with a preview of their recipes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    #[serde(flatten)]
    pub author: Author,
    #[serde(default)]
    pub recipes: Vec<ShortRecipe>,
    #[serde(default)]
    pub recipes_count: i32,
}

/// Paginated list wrapper used by the listing endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    /// Total number of items across all pages
    pub count: i32,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    pub results: Vec<T>,
}

/// Parameters for a filtered page of recipes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeQuery {
    /// 1-indexed page number
    pub page: u32,
    pub limit: u32,
    pub author: Option<i32>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
    /// Slugs of the active tag filters
    pub tags: Vec<String>,
}

impl Default for RecipeQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: PAGE_SIZE,
            author: None,
            is_favorited: false,
            is_in_shopping_cart: false,
            tags: Vec::new(),
        }
    }
}

impl RecipeQuery {
    /// Query-string pairs in the order the backend expects them.
    ///
    /// Boolean predicates are only sent when set. Each tag becomes its own
    /// `tags=` pair; with no tags the backend applies no tag filter at all.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("page", self.page.to_string()),
            ("limit", self.limit.to_string()),
        ];
        if let Some(author) = self.author {
            pairs.push(("author", author.to_string()));
        }
        if self.is_favorited {
            pairs.push(("is_favorited", "true".to_string()));
        }
        if self.is_in_shopping_cart {
            pairs.push(("is_in_shopping_cart", "true".to_string()));
        }
        for slug in &self.tags {
            pairs.push(("tags", slug.clone()));
        }
        pairs
    }

    /// Encoded query string without the leading `?`.
    pub fn to_query_string(&self) -> String {
        self.query_pairs()
            .into_iter()
            .map(|(key, value)| format!("{}={}", key, urlencoding::encode(&value)))
            .collect::<Vec<_>>()
            .join("&")
    }
}
