use anyhow::Result;
use reqwest::{Client, RequestBuilder, Response};

use crate::client::{
    auth::{FoodgramAuth, SharedAuth},
    types::*,
};

#[derive(Clone)]
pub struct FoodgramClient {
    base_url: String,
    client: Client,
    auth: FoodgramAuth,
}

impl FoodgramClient {
    pub fn new(base_url: String) -> Self {
        Self::with_shared_auth(base_url, SharedAuth::new())
    }

    /// Client whose token lives in `auth`, so logging in through any client
    /// built from the same handle authenticates all of them.
    pub fn with_shared_auth(base_url: String, auth: SharedAuth) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        Self {
            client: Client::new(),
            auth: FoodgramAuth::with_shared(base_url.clone(), auth),
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn authenticate(&self, email: String, password: String) -> Result<()> {
        self.auth.authenticate(email, password).await
    }

    pub async fn is_authenticated(&self) -> bool {
        self.auth.is_authenticated().await
    }

    pub async fn get_token_preview(&self) -> Option<String> {
        self.auth
            .get_token()
            .await
            .map(|t| crate::client::auth::preview(&t))
    }

    pub async fn set_token(&self, token: String) {
        self.auth.set_token(token).await;
    }

    pub fn shared_auth(&self) -> SharedAuth {
        self.auth.shared()
    }

    async fn public(&self, request: RequestBuilder) -> RequestBuilder {
        match self.auth.optional_header().await {
            Some(header) => request.header("Authorization", header),
            None => request,
        }
    }

    async fn private(&self, request: RequestBuilder) -> Result<RequestBuilder> {
        let header = self.auth.require_header().await?;
        Ok(request.header("Authorization", header))
    }

    async fn send(&self, request: RequestBuilder, what: &str) -> Result<Response> {
        let response = request.send().await.map_err(|e| {
            tracing::warn!("Network error while trying to {}: {}", what, e);
            anyhow::anyhow!("Failed to connect to Foodgram API: {}", e)
        })?;

        let status = response.status();
        tracing::debug!("Response status for {}: {}", what, status);

        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            tracing::warn!("Failed to {} with status {}: {}", what, status, error_body);

            match status.as_u16() {
                400 => anyhow::bail!("Failed to {}: rejected by server: {}", what, error_body),
                401 => anyhow::bail!("Failed to {}: authentication expired or invalid", what),
                403 => anyhow::bail!("Failed to {}: access denied", what),
                404 => anyhow::bail!("Failed to {}: not found", what),
                500..=599 => anyhow::bail!("Foodgram server error while trying to {} ({}): {}", what, status, error_body),
                _ => anyhow::bail!("Failed to {} with status {}: {}", what, status, error_body),
            }
        }

        Ok(response)
    }

    // Recipe operations
    pub async fn get_recipes(&self, query: &RecipeQuery) -> Result<PaginatedResponse<Recipe>> {
        let url = format!("{}/api/recipes/?{}", self.base_url, query.to_query_string());
        tracing::debug!("Requesting recipes: {}", url);

        let request = self.public(self.client.get(&url)).await;
        let response = self.send(request, "get recipes").await?;

        let recipes: PaginatedResponse<Recipe> = response.json().await.map_err(|e| {
            tracing::warn!("Failed to parse recipes response: {}", e);
            anyhow::anyhow!("Invalid response format from Foodgram server: {}", e)
        })?;

        tracing::debug!("Received {} of {} recipes", recipes.results.len(), recipes.count);
        Ok(recipes)
    }

    pub async fn get_recipe(&self, id: i32) -> Result<Recipe> {
        let url = format!("{}/api/recipes/{}/", self.base_url, id);

        let request = self.public(self.client.get(&url)).await;
        let response = self.send(request, "get recipe").await?;

        let recipe = response.json().await?;
        Ok(recipe)
    }

    pub async fn get_tags(&self) -> Result<Vec<Tag>> {
        let url = format!("{}/api/tags/", self.base_url);
        tracing::debug!("Requesting tags: {}", url);

        let response = self.send(self.client.get(&url), "get tags").await?;

        let tags: Vec<Tag> = response.json().await?;
        tracing::debug!("Received {} tags", tags.len());
        Ok(tags)
    }

    // Favorites
    pub async fn add_to_favorites(&self, recipe_id: i32) -> Result<ShortRecipe> {
        let url = format!("{}/api/recipes/{}/favorite/", self.base_url, recipe_id);

        let request = self.private(self.client.post(&url)).await?;
        let response = self.send(request, "add recipe to favorites").await?;

        let recipe = response.json().await?;
        Ok(recipe)
    }

    pub async fn remove_from_favorites(&self, recipe_id: i32) -> Result<()> {
        let url = format!("{}/api/recipes/{}/favorite/", self.base_url, recipe_id);

        let request = self.private(self.client.delete(&url)).await?;
        self.send(request, "remove recipe from favorites").await?;

        Ok(())
    }

    // Shopping cart
    pub async fn add_to_cart(&self, recipe_id: i32) -> Result<ShortRecipe> {
        let url = format!("{}/api/recipes/{}/shopping_cart/", self.base_url, recipe_id);

        let request = self.private(self.client.post(&url)).await?;
        let response = self.send(request, "add recipe to shopping cart").await?;

        let recipe = response.json().await?;
        Ok(recipe)
    }

    pub async fn remove_from_cart(&self, recipe_id: i32) -> Result<()> {
        let url = format!("{}/api/recipes/{}/shopping_cart/", self.base_url, recipe_id);

        let request = self.private(self.client.delete(&url)).await?;
        self.send(request, "remove recipe from shopping cart").await?;

        Ok(())
    }

    /// Plain-text shopping list aggregated from every recipe in the cart.
    pub async fn download_shopping_cart(&self) -> Result<String> {
        let url = format!("{}/api/recipes/download_shopping_cart/", self.base_url);

        let request = self.private(self.client.get(&url)).await?;
        let response = self.send(request, "download shopping list").await?;

        Ok(response.text().await?)
    }

    // Subscriptions
    pub async fn get_subscriptions(
        &self,
        page: u32,
        limit: u32,
        recipes_limit: u32,
    ) -> Result<PaginatedResponse<Subscription>> {
        let url = format!(
            "{}/api/users/subscriptions/?page={}&limit={}&recipes_limit={}",
            self.base_url, page, limit, recipes_limit
        );
        tracing::debug!("Requesting subscriptions: {}", url);

        let request = self.private(self.client.get(&url)).await?;
        let response = self.send(request, "get subscriptions").await?;

        let subscriptions = response.json().await?;
        Ok(subscriptions)
    }

    pub async fn subscribe(&self, author_id: i32) -> Result<Subscription> {
        let url = format!("{}/api/users/{}/subscribe/", self.base_url, author_id);

        let request = self.private(self.client.post(&url)).await?;
        let response = self.send(request, "subscribe to author").await?;

        let subscription = response.json().await?;
        Ok(subscription)
    }

    pub async fn unsubscribe(&self, author_id: i32) -> Result<()> {
        let url = format!("{}/api/users/{}/subscribe/", self.base_url, author_id);

        let request = self.private(self.client.delete(&url)).await?;
        self.send(request, "unsubscribe from author").await?;

        Ok(())
    }
}
