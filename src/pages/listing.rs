use std::sync::Arc;

use anyhow::Result;

use crate::client::RecipeApi;
use crate::pages::{PageKind, PageView};
use crate::view_model::{FetchOutcome, OrdersCounter, RecipeListViewModel, TagToggle};

/// A mounted recipe listing (Recipes, Favorites, Shopping list or an author).
///
/// Construction does no I/O; [`RecipeListPage::mount`] loads the tag filters
/// and the first page. Dropping the page discards its state.
pub struct RecipeListPage<A: RecipeApi> {
    kind: PageKind,
    view_model: RecipeListViewModel<A>,
}

impl<A: RecipeApi> Clone for RecipeListPage<A> {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            view_model: self.view_model.clone(),
        }
    }
}

impl<A: RecipeApi> RecipeListPage<A> {
    pub fn new(kind: PageKind, api: Arc<A>, orders: OrdersCounter) -> Self {
        Self {
            kind,
            view_model: RecipeListViewModel::with_orders(api, kind.predicate(), orders),
        }
    }

    pub fn kind(&self) -> PageKind {
        self.kind
    }

    pub fn view_model(&self) -> &RecipeListViewModel<A> {
        &self.view_model
    }

    pub async fn mount(&self) -> Result<FetchOutcome> {
        tracing::info!("Mounting {} page", self.kind.title());
        self.view_model.mount(self.kind.has_tag_filter()).await
    }

    pub async fn view(&self) -> PageView {
        PageView::render(self.kind, &self.view_model.state().await)
    }

    pub async fn set_page(&self, page: u32) -> Result<FetchOutcome> {
        self.view_model.set_recipes_page(page).await
    }

    pub async fn toggle_tag(&self, slug: &str) -> Result<TagToggle> {
        if !self.kind.has_tag_filter() {
            anyhow::bail!("The {} page has no tag filter", self.kind.title());
        }
        self.view_model.handle_tags_change(slug).await
    }

    pub async fn toggle_favorite(&self, recipe_id: i32) -> Result<bool> {
        self.view_model.handle_like(recipe_id).await
    }

    pub async fn toggle_cart(&self, recipe_id: i32) -> Result<bool> {
        self.view_model.handle_add_to_cart(recipe_id).await
    }
}
