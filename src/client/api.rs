//! Backend seams consumed by the view-models and the MCP server.
//!
//! Pages and sessions never talk to [`FoodgramClient`] directly; they go
//! through these traits so they can be driven by any backend, including the
//! in-memory one used in tests.

use anyhow::Result;
use async_trait::async_trait;

use crate::client::{
    client::FoodgramClient,
    types::{PaginatedResponse, Recipe, RecipeQuery, ShortRecipe, Subscription, Tag},
};

/// Calls a recipe listing page needs.
#[async_trait]
pub trait RecipeApi: Send + Sync + 'static {
    /// A filtered page of recipes
    async fn get_recipes(&self, query: &RecipeQuery) -> Result<PaginatedResponse<Recipe>>;

    async fn get_recipe(&self, recipe_id: i32) -> Result<Recipe>;

    /// The full tag vocabulary
    async fn get_tags(&self) -> Result<Vec<Tag>>;

    async fn add_to_favorites(&self, recipe_id: i32) -> Result<ShortRecipe>;

    async fn remove_from_favorites(&self, recipe_id: i32) -> Result<()>;

    async fn add_to_cart(&self, recipe_id: i32) -> Result<ShortRecipe>;

    async fn remove_from_cart(&self, recipe_id: i32) -> Result<()>;

    /// Ingredients of every recipe in the cart, summed, as plain text
    async fn download_shopping_cart(&self) -> Result<String>;
}

/// Calls the subscriptions page needs.
#[async_trait]
pub trait SubscriptionApi: Send + Sync + 'static {
    async fn get_subscriptions(
        &self,
        page: u32,
        limit: u32,
        recipes_limit: u32,
    ) -> Result<PaginatedResponse<Subscription>>;

    async fn subscribe(&self, author_id: i32) -> Result<Subscription>;

    async fn unsubscribe(&self, author_id: i32) -> Result<()>;
}

/// Everything one MCP session needs from the backend.
#[async_trait]
pub trait FoodgramBackend: RecipeApi + SubscriptionApi {
    async fn is_authenticated(&self) -> bool;
}

#[async_trait]
impl RecipeApi for FoodgramClient {
    async fn get_recipes(&self, query: &RecipeQuery) -> Result<PaginatedResponse<Recipe>> {
        FoodgramClient::get_recipes(self, query).await
    }

    async fn get_recipe(&self, recipe_id: i32) -> Result<Recipe> {
        FoodgramClient::get_recipe(self, recipe_id).await
    }

    async fn get_tags(&self) -> Result<Vec<Tag>> {
        FoodgramClient::get_tags(self).await
    }

    async fn add_to_favorites(&self, recipe_id: i32) -> Result<ShortRecipe> {
        FoodgramClient::add_to_favorites(self, recipe_id).await
    }

    async fn remove_from_favorites(&self, recipe_id: i32) -> Result<()> {
        FoodgramClient::remove_from_favorites(self, recipe_id).await
    }

    async fn add_to_cart(&self, recipe_id: i32) -> Result<ShortRecipe> {
        FoodgramClient::add_to_cart(self, recipe_id).await
    }

    async fn remove_from_cart(&self, recipe_id: i32) -> Result<()> {
        FoodgramClient::remove_from_cart(self, recipe_id).await
    }

    async fn download_shopping_cart(&self) -> Result<String> {
        FoodgramClient::download_shopping_cart(self).await
    }
}

#[async_trait]
impl SubscriptionApi for FoodgramClient {
    async fn get_subscriptions(
        &self,
        page: u32,
        limit: u32,
        recipes_limit: u32,
    ) -> Result<PaginatedResponse<Subscription>> {
        FoodgramClient::get_subscriptions(self, page, limit, recipes_limit).await
    }

    async fn subscribe(&self, author_id: i32) -> Result<Subscription> {
        FoodgramClient::subscribe(self, author_id).await
    }

    async fn unsubscribe(&self, author_id: i32) -> Result<()> {
        FoodgramClient::unsubscribe(self, author_id).await
    }
}

#[async_trait]
impl FoodgramBackend for FoodgramClient {
    async fn is_authenticated(&self) -> bool {
        FoodgramClient::is_authenticated(self).await
    }
}
