#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;
use mcp_foodgram::client::{
    Author, FoodgramBackend, PaginatedResponse, Recipe, RecipeApi, RecipeQuery, ShortRecipe,
    Subscription, SubscriptionApi, Tag,
};
use tokio::sync::oneshot;

/// Favorite, cart and subscription calls seen by the fake backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    AddFavorite(i32),
    RemoveFavorite(i32),
    AddToCart(i32),
    RemoveFromCart(i32),
    Subscribe(i32),
    Unsubscribe(i32),
}

/// In-memory Foodgram backend.
///
/// Filters and paginates its catalog the way the real listing endpoint does,
/// unless a canned response is registered for the requested page.
#[derive(Default)]
pub struct FakeBackend {
    catalog: Mutex<Vec<Recipe>>,
    tags: Mutex<Vec<Tag>>,
    subscriptions: Mutex<Vec<Subscription>>,
    canned: Mutex<HashMap<u32, PaginatedResponse<Recipe>>>,
    gates: Mutex<HashMap<u32, oneshot::Receiver<()>>>,
    queries: Mutex<Vec<RecipeQuery>>,
    calls: Mutex<Vec<Call>>,
    tag_requests: Mutex<usize>,
    subscription_requests: Mutex<Vec<u32>>,
    pub fail_recipes: AtomicBool,
    pub fail_tags: AtomicBool,
    pub fail_toggles: AtomicBool,
    pub logged_in: AtomicBool,
}

impl FakeBackend {
    pub fn new(catalog: Vec<Recipe>, tags: Vec<Tag>) -> Self {
        let backend = Self::default();
        *backend.catalog.lock().unwrap() = catalog;
        *backend.tags.lock().unwrap() = tags;
        backend
    }

    pub fn with_subscriptions(subscriptions: Vec<Subscription>) -> Self {
        let backend = Self::default();
        *backend.subscriptions.lock().unwrap() = subscriptions;
        backend
    }

    /// Same backend, seen by a logged-in session.
    pub fn logged_in(self) -> Self {
        self.logged_in.store(true, Ordering::SeqCst);
        self
    }

    pub fn subscriptions(&self) -> Vec<Subscription> {
        self.subscriptions.lock().unwrap().clone()
    }

    pub fn respond_with(&self, page: u32, response: PaginatedResponse<Recipe>) {
        self.canned.lock().unwrap().insert(page, response);
    }

    /// Hold every response for `page` until the returned sender fires.
    pub fn gate(&self, page: u32) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert(page, rx);
        tx
    }

    pub fn queries(&self) -> Vec<RecipeQuery> {
        self.queries.lock().unwrap().clone()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn tag_requests(&self) -> usize {
        *self.tag_requests.lock().unwrap()
    }

    pub fn subscription_requests(&self) -> Vec<u32> {
        self.subscription_requests.lock().unwrap().clone()
    }

    pub fn stored(&self, id: i32) -> Option<Recipe> {
        self.catalog.lock().unwrap().iter().find(|r| r.id == id).cloned()
    }

    fn set_flag(&self, id: i32, apply: impl FnOnce(&mut Recipe)) {
        if let Some(recipe) = self.catalog.lock().unwrap().iter_mut().find(|r| r.id == id) {
            apply(recipe);
        }
    }

    fn short(&self, id: i32) -> ShortRecipe {
        let name = self.stored(id).map(|r| r.name).unwrap_or_default();
        ShortRecipe {
            id,
            name,
            image: None,
            cooking_time: None,
        }
    }

    fn toggle(&self, call: Call) -> Result<()> {
        if self.fail_toggles.load(Ordering::SeqCst) {
            anyhow::bail!("Foodgram server error (500): toggle failed");
        }
        self.calls.lock().unwrap().push(call);
        Ok(())
    }
}

#[async_trait]
impl RecipeApi for FakeBackend {
    async fn get_recipes(&self, query: &RecipeQuery) -> Result<PaginatedResponse<Recipe>> {
        self.queries.lock().unwrap().push(query.clone());

        let gate = self.gates.lock().unwrap().remove(&query.page);
        if let Some(gate) = gate {
            let _ = gate.await;
        }

        if self.fail_recipes.load(Ordering::SeqCst) {
            anyhow::bail!("Failed to connect to Foodgram API: connection refused");
        }

        if let Some(response) = self.canned.lock().unwrap().get(&query.page) {
            return Ok(response.clone());
        }

        let matching: Vec<Recipe> = self
            .catalog
            .lock()
            .unwrap()
            .iter()
            .filter(|r| !query.is_favorited || r.is_favorited)
            .filter(|r| !query.is_in_shopping_cart || r.is_in_shopping_cart)
            .filter(|r| query.author.map_or(true, |id| r.author.as_ref().map(|a| a.id) == Some(id)))
            .filter(|r| {
                query.tags.is_empty() || r.tags.iter().any(|t| query.tags.contains(&t.slug))
            })
            .cloned()
            .collect();

        let start = ((query.page.max(1) - 1) * query.limit) as usize;
        let results = matching
            .iter()
            .skip(start)
            .take(query.limit as usize)
            .cloned()
            .collect();

        Ok(PaginatedResponse {
            count: matching.len() as i32,
            next: None,
            previous: None,
            results,
        })
    }

    async fn get_recipe(&self, recipe_id: i32) -> Result<Recipe> {
        match self.stored(recipe_id) {
            Some(recipe) => Ok(recipe),
            None => anyhow::bail!("Failed to get recipe: not found"),
        }
    }

    async fn get_tags(&self) -> Result<Vec<Tag>> {
        *self.tag_requests.lock().unwrap() += 1;
        if self.fail_tags.load(Ordering::SeqCst) {
            anyhow::bail!("Failed to get tags: not found");
        }
        Ok(self.tags.lock().unwrap().clone())
    }

    async fn add_to_favorites(&self, recipe_id: i32) -> Result<ShortRecipe> {
        self.toggle(Call::AddFavorite(recipe_id))?;
        self.set_flag(recipe_id, |r| r.is_favorited = true);
        Ok(self.short(recipe_id))
    }

    async fn remove_from_favorites(&self, recipe_id: i32) -> Result<()> {
        self.toggle(Call::RemoveFavorite(recipe_id))?;
        self.set_flag(recipe_id, |r| r.is_favorited = false);
        Ok(())
    }

    async fn add_to_cart(&self, recipe_id: i32) -> Result<ShortRecipe> {
        self.toggle(Call::AddToCart(recipe_id))?;
        self.set_flag(recipe_id, |r| r.is_in_shopping_cart = true);
        Ok(self.short(recipe_id))
    }

    async fn remove_from_cart(&self, recipe_id: i32) -> Result<()> {
        self.toggle(Call::RemoveFromCart(recipe_id))?;
        self.set_flag(recipe_id, |r| r.is_in_shopping_cart = false);
        Ok(())
    }

    async fn download_shopping_cart(&self) -> Result<String> {
        if !self.logged_in.load(Ordering::SeqCst) {
            anyhow::bail!("Not authenticated - log in to use this page");
        }
        let lines: Vec<String> = self
            .catalog
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.is_in_shopping_cart)
            .map(|r| format!("{} - 1 portion", r.name))
            .collect();
        Ok(lines.join("\n"))
    }
}

#[async_trait]
impl SubscriptionApi for FakeBackend {
    async fn get_subscriptions(
        &self,
        page: u32,
        limit: u32,
        recipes_limit: u32,
    ) -> Result<PaginatedResponse<Subscription>> {
        self.subscription_requests.lock().unwrap().push(page);
        let all = self.subscriptions.lock().unwrap().clone();
        let start = ((page.max(1) - 1) * limit) as usize;
        let results = all
            .iter()
            .skip(start)
            .take(limit as usize)
            .cloned()
            .map(|mut s| {
                s.recipes.truncate(recipes_limit as usize);
                s
            })
            .collect();
        Ok(PaginatedResponse {
            count: all.len() as i32,
            next: None,
            previous: None,
            results,
        })
    }

    async fn subscribe(&self, author_id: i32) -> Result<Subscription> {
        self.toggle(Call::Subscribe(author_id))?;

        let mut catalog = self.catalog.lock().unwrap();
        let mut followed = author(author_id, &format!("author{}", author_id));
        for recipe in catalog.iter_mut() {
            if let Some(a) = recipe.author.as_mut().filter(|a| a.id == author_id) {
                a.is_subscribed = true;
                followed = a.clone();
            }
        }
        let recipes: Vec<ShortRecipe> = catalog
            .iter()
            .filter(|r| r.author.as_ref().map(|a| a.id) == Some(author_id))
            .map(|r| ShortRecipe {
                id: r.id,
                name: r.name.clone(),
                image: None,
                cooking_time: r.cooking_time,
            })
            .collect();
        drop(catalog);

        let subscription = Subscription {
            author: followed,
            recipes_count: recipes.len() as i32,
            recipes,
        };
        self.subscriptions.lock().unwrap().push(subscription.clone());
        Ok(subscription)
    }

    async fn unsubscribe(&self, author_id: i32) -> Result<()> {
        self.toggle(Call::Unsubscribe(author_id))?;
        self.subscriptions
            .lock()
            .unwrap()
            .retain(|s| s.author.id != author_id);
        Ok(())
    }
}

#[async_trait]
impl FoodgramBackend for FakeBackend {
    async fn is_authenticated(&self) -> bool {
        self.logged_in.load(Ordering::SeqCst)
    }
}

pub fn tag(id: i32, name: &str, slug: &str) -> Tag {
    Tag {
        id,
        name: name.to_string(),
        color: None,
        slug: slug.to_string(),
    }
}

pub fn recipe(id: i32, name: &str, tags: &[&Tag]) -> Recipe {
    Recipe {
        id,
        name: name.to_string(),
        image: Some(format!("/media/recipes/{}.jpg", id)),
        text: None,
        cooking_time: Some(20),
        author: Some(author(1, "chef")),
        tags: tags.iter().map(|t| (*t).clone()).collect(),
        ingredients: Vec::new(),
        is_favorited: false,
        is_in_shopping_cart: false,
        pub_date: None,
    }
}

pub fn favorite(id: i32, name: &str, tags: &[&Tag]) -> Recipe {
    Recipe {
        is_favorited: true,
        ..recipe(id, name, tags)
    }
}

pub fn author(id: i32, username: &str) -> Author {
    Author {
        id,
        email: Some(format!("{}@example.com", username)),
        username: username.to_string(),
        first_name: None,
        last_name: None,
        is_subscribed: true,
    }
}

pub fn subscription(id: i32, username: &str, recipes: usize) -> Subscription {
    Subscription {
        author: author(id, username),
        recipes: (0..recipes)
            .map(|n| ShortRecipe {
                id: id * 100 + n as i32,
                name: format!("{} recipe {}", username, n),
                image: None,
                cooking_time: Some(15),
            })
            .collect(),
        recipes_count: recipes as i32,
    }
}

/// Breakfast, lunch and dinner tags.
pub fn meal_tags() -> (Tag, Tag, Tag) {
    (
        tag(1, "Breakfast", "breakfast"),
        tag(2, "Lunch", "lunch"),
        tag(3, "Dinner", "dinner"),
    )
}

pub fn init_test_logging() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init();
}

/// Live backend settings; live tests are skipped unless these are set.
pub struct LiveEnvironment {
    pub base_url: String,
    pub email: Option<String>,
    pub password: Option<String>,
}

impl LiveEnvironment {
    pub fn from_env() -> Option<Self> {
        let base_url = std::env::var("FOODGRAM_TEST_BASE_URL").ok()?;
        Some(Self {
            base_url,
            email: std::env::var("FOODGRAM_TEST_EMAIL").ok(),
            password: std::env::var("FOODGRAM_TEST_PASSWORD").ok(),
        })
    }
}
