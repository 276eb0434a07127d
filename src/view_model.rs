//! # Recipe list view-model
//!
//! Owns the state of one mounted listing page (the current page of recipes,
//! the server-side total, the page number and the tag filters) and mediates
//! between user actions and the [`RecipeApi`].
//!
//! ## Fetch ordering
//!
//! Every list fetch draws a ticket from a monotonically increasing sequence.
//! A response is applied only if no newer fetch has been issued since, so a
//! slow response for an old page or filter set can never overwrite a newer
//! result, even when the newer fetch fails. Requests are not cancelled; stale
//! responses are dropped.
//!
//! ## Failure policy
//!
//! Each network call returns its error to the caller after logging it at
//! `warn`. State is only mutated after a call succeeds: like and cart
//! toggles wait for the server before flipping the flag, so there is
//! nothing to roll back.

use std::sync::{
    atomic::{AtomicU32, Ordering},
    Arc,
};

use anyhow::Result;
use serde::Serialize;
use tokio::sync::Mutex;

use crate::client::{Recipe, RecipeApi, RecipeQuery, TagFilter, PAGE_SIZE};

/// Server-side predicate that defines which recipes a listing shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListPredicate {
    All,
    Favorited,
    InShoppingCart,
    Author(i32),
}

impl ListPredicate {
    fn apply(self, query: &mut RecipeQuery) {
        match self {
            ListPredicate::All => {}
            ListPredicate::Favorited => query.is_favorited = true,
            ListPredicate::InShoppingCart => query.is_in_shopping_cart = true,
            ListPredicate::Author(id) => query.author = Some(id),
        }
    }
}

/// Number of recipes in the user's shopping cart, shown next to the cart link.
///
/// Cloned into every page so a cart toggle on any listing keeps it current.
#[derive(Debug, Clone, Default)]
pub struct OrdersCounter(Arc<AtomicU32>);

impl OrdersCounter {
    pub fn new(initial: u32) -> Self {
        Self(Arc::new(AtomicU32::new(initial)))
    }

    pub fn get(&self) -> u32 {
        self.0.load(Ordering::SeqCst)
    }

    pub fn set(&self, value: u32) {
        self.0.store(value, Ordering::SeqCst);
    }

    /// Count one recipe in (`add`) or out of the cart. Never goes below zero.
    pub fn update(&self, add: bool) -> u32 {
        let step = |count: u32| {
            if add {
                count.saturating_add(1)
            } else {
                count.saturating_sub(1)
            }
        };
        self.0
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |count| {
                Some(step(count)).filter(|next| *next != count)
            })
            .map_or_else(|unchanged| unchanged, step)
    }
}

/// Snapshot of a listing's state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListState {
    pub recipes: Vec<Recipe>,
    /// Total number of matching recipes on the server
    pub recipes_count: i32,
    /// Current 1-indexed page
    pub recipes_page: u32,
    pub tags: Vec<TagFilter>,
}

impl Default for ListState {
    fn default() -> Self {
        Self {
            recipes: Vec::new(),
            recipes_count: 0,
            recipes_page: 1,
            tags: Vec::new(),
        }
    }
}

impl ListState {
    pub fn active_tags(&self) -> Vec<String> {
        self.tags
            .iter()
            .filter(|tag| tag.value)
            .map(|tag| tag.slug().to_string())
            .collect()
    }
}

/// What happened to the response of a list fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The response replaced the listed recipes
    Applied,
    /// A newer response had already been applied; this one was dropped
    Superseded,
}

/// Result of toggling a tag filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagToggle {
    Toggled { active: bool, fetch: FetchOutcome },
    /// No tag with that slug; nothing changed and nothing was fetched
    Unknown,
}

/// Request sequence shared by a page's fetches.
#[derive(Debug, Default)]
pub(crate) struct Tickets {
    issued: u64,
}

impl Tickets {
    pub(crate) fn issue(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }

    /// Whether a response for `ticket` may be applied. Only the newest request
    /// counts, whether it has completed, failed or is still in flight.
    pub(crate) fn accept(&self, ticket: u64) -> bool {
        if ticket < self.issued {
            tracing::debug!(ticket, latest = self.issued, "Dropping stale response");
            return false;
        }
        true
    }
}

struct Shared {
    list: ListState,
    tickets: Tickets,
}

struct Inner<A> {
    api: Arc<A>,
    predicate: ListPredicate,
    orders: Option<OrdersCounter>,
    shared: Mutex<Shared>,
}

pub struct RecipeListViewModel<A: RecipeApi> {
    inner: Arc<Inner<A>>,
}

impl<A: RecipeApi> Clone for RecipeListViewModel<A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<A: RecipeApi> RecipeListViewModel<A> {
    pub fn new(api: Arc<A>, predicate: ListPredicate) -> Self {
        Self::build(api, predicate, None)
    }

    /// View-model whose cart toggles also update `orders`.
    pub fn with_orders(api: Arc<A>, predicate: ListPredicate, orders: OrdersCounter) -> Self {
        Self::build(api, predicate, Some(orders))
    }

    fn build(api: Arc<A>, predicate: ListPredicate, orders: Option<OrdersCounter>) -> Self {
        Self {
            inner: Arc::new(Inner {
                api,
                predicate,
                orders,
                shared: Mutex::new(Shared {
                    list: ListState::default(),
                    tickets: Tickets::default(),
                }),
            }),
        }
    }

    pub async fn state(&self) -> ListState {
        self.inner.shared.lock().await.list.clone()
    }

    pub async fn recipes_page(&self) -> u32 {
        self.inner.shared.lock().await.list.recipes_page
    }

    /// Load the tag vocabulary (when `with_tags`) and then the current page.
    ///
    /// A failed tag load is logged and the page is fetched unfiltered.
    pub async fn mount(&self, with_tags: bool) -> Result<FetchOutcome> {
        if with_tags {
            if let Err(e) = self.load_tags().await {
                tracing::warn!("Continuing without tag filters: {}", e);
            }
        }
        self.refresh().await
    }

    /// Replace the tag filters with the server vocabulary, all active.
    pub async fn load_tags(&self) -> Result<()> {
        let tags = self.inner.api.get_tags().await.map_err(|e| {
            tracing::warn!("Failed to load tags: {}", e);
            e
        })?;

        tracing::debug!("Loaded {} tag filters", tags.len());
        let mut shared = self.inner.shared.lock().await;
        shared.list.tags = tags.into_iter().map(TagFilter::active).collect();
        Ok(())
    }

    /// Fetch the current page with the active tag filters.
    pub async fn refresh(&self) -> Result<FetchOutcome> {
        let (ticket, query) = {
            let mut shared = self.inner.shared.lock().await;
            let ticket = shared.tickets.issue();
            let mut query = RecipeQuery {
                page: shared.list.recipes_page,
                limit: PAGE_SIZE,
                tags: shared.list.active_tags(),
                ..Default::default()
            };
            self.inner.predicate.apply(&mut query);
            (ticket, query)
        };

        tracing::debug!(ticket, page = query.page, tags = ?query.tags, "Fetching recipes");

        let page = self.inner.api.get_recipes(&query).await.map_err(|e| {
            tracing::warn!("Failed to fetch page {} of recipes: {}", query.page, e);
            e
        })?;

        let mut shared = self.inner.shared.lock().await;
        if !shared.tickets.accept(ticket) {
            return Ok(FetchOutcome::Superseded);
        }

        shared.list.recipes = page.results;
        shared.list.recipes_count = page.count;
        Ok(FetchOutcome::Applied)
    }

    /// Switch to page `page` (1-indexed) and fetch it.
    ///
    /// Pages past the end are not rejected; the server decides what they hold.
    pub async fn set_recipes_page(&self, page: u32) -> Result<FetchOutcome> {
        anyhow::ensure!(page >= 1, "Page numbers start at 1, got {}", page);

        self.inner.shared.lock().await.list.recipes_page = page;
        self.refresh().await
    }

    /// Flip the filter flag of the tag with `slug` and refetch.
    pub async fn handle_tags_change(&self, slug: &str) -> Result<TagToggle> {
        let active = {
            let mut shared = self.inner.shared.lock().await;
            match shared.list.tags.iter_mut().find(|tag| tag.slug() == slug) {
                Some(tag) => {
                    tag.value = !tag.value;
                    tag.value
                }
                None => {
                    tracing::debug!("Ignoring toggle of unknown tag '{}'", slug);
                    return Ok(TagToggle::Unknown);
                }
            }
        };

        let fetch = self.refresh().await?;
        Ok(TagToggle::Toggled { active, fetch })
    }

    /// Add the recipe to favorites, or remove it if it already is one.
    /// Returns the new `is_favorited` value.
    pub async fn handle_like(&self, recipe_id: i32) -> Result<bool> {
        let favorited = self.flag(recipe_id, |recipe| recipe.is_favorited).await?;

        let result = if favorited {
            self.inner.api.remove_from_favorites(recipe_id).await
        } else {
            self.inner.api.add_to_favorites(recipe_id).await.map(|_| ())
        };
        if let Err(e) = result {
            tracing::warn!("Failed to toggle favorite for recipe {}: {}", recipe_id, e);
            return Err(e);
        }

        self.update(recipe_id, |recipe| recipe.is_favorited = !favorited)
            .await;
        Ok(!favorited)
    }

    /// Put the recipe in the shopping cart, or take it out if it is there.
    /// Returns the new `is_in_shopping_cart` value.
    pub async fn handle_add_to_cart(&self, recipe_id: i32) -> Result<bool> {
        let in_cart = self
            .flag(recipe_id, |recipe| recipe.is_in_shopping_cart)
            .await?;

        let result = if in_cart {
            self.inner.api.remove_from_cart(recipe_id).await
        } else {
            self.inner.api.add_to_cart(recipe_id).await.map(|_| ())
        };
        if let Err(e) = result {
            tracing::warn!("Failed to toggle shopping cart for recipe {}: {}", recipe_id, e);
            return Err(e);
        }

        self.update(recipe_id, |recipe| recipe.is_in_shopping_cart = !in_cart)
            .await;
        if let Some(orders) = &self.inner.orders {
            let count = orders.update(!in_cart);
            tracing::debug!("Shopping cart now holds {} recipes", count);
        }
        Ok(!in_cart)
    }

    async fn flag(&self, recipe_id: i32, read: impl Fn(&Recipe) -> bool) -> Result<bool> {
        let shared = self.inner.shared.lock().await;
        match shared.list.recipes.iter().find(|recipe| recipe.id == recipe_id) {
            Some(recipe) => Ok(read(recipe)),
            None => anyhow::bail!("Recipe {} is not on the current page", recipe_id),
        }
    }

    // The page may have been refetched while the call was in flight; a recipe
    // that is no longer listed is left alone.
    async fn update(&self, recipe_id: i32, apply: impl FnOnce(&mut Recipe)) {
        let mut shared = self.inner.shared.lock().await;
        if let Some(recipe) = shared
            .list
            .recipes
            .iter_mut()
            .find(|recipe| recipe.id == recipe_id)
        {
            apply(recipe);
        }
    }
}
