//! Page components and the render model they produce.
//!
//! A page declares what data it needs and turns view-model state into a
//! [`PageView`]; fetching is delegated to the view-model.

pub mod listing;
pub mod subscriptions;

use serde::Serialize;

use crate::client::{Recipe, TagFilter, PAGE_SIZE};
use crate::view_model::{ListPredicate, ListState};

pub use listing::RecipeListPage;
pub use subscriptions::{SubscriptionsPage, SubscriptionsState};

/// The recipe listings of the site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PageKind {
    Recipes,
    Favorites,
    ShoppingCart,
    /// Recipes published by one author (`/user/{id}`)
    Author(i32),
}

impl PageKind {
    pub fn title(self) -> &'static str {
        match self {
            PageKind::Recipes => "Recipes",
            PageKind::Favorites => "Favorite",
            PageKind::ShoppingCart => "Shopping list",
            PageKind::Author(_) => "Author",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            PageKind::Recipes => "Goods Assistant - Recipes",
            PageKind::Favorites => "Goods Assistant - Favorite",
            PageKind::ShoppingCart => "Goods Assistant - Shopping list",
            PageKind::Author(_) => "Goods Assistant - Author",
        }
    }

    pub fn predicate(self) -> ListPredicate {
        match self {
            PageKind::Recipes => ListPredicate::All,
            PageKind::Favorites => ListPredicate::Favorited,
            PageKind::ShoppingCart => ListPredicate::InShoppingCart,
            PageKind::Author(id) => ListPredicate::Author(id),
        }
    }

    pub fn has_tag_filter(self) -> bool {
        !matches!(self, PageKind::ShoppingCart)
    }
}

/// Number of pages needed for `count` items, `limit` per page.
pub fn page_count(count: i32, limit: u32) -> u32 {
    if count <= 0 || limit == 0 {
        return 0;
    }
    (count as u32).div_ceil(limit)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginationView {
    pub count: i32,
    pub limit: u32,
    pub current: u32,
    pub pages: u32,
}

impl PaginationView {
    pub fn new(count: i32, current: u32) -> Self {
        Self {
            count,
            limit: PAGE_SIZE,
            current,
            pages: page_count(count, PAGE_SIZE),
        }
    }
}

/// One recipe card with the flags its like and cart buttons show.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecipeCard {
    pub id: i32,
    pub name: String,
    pub image: Option<String>,
    pub cooking_time: Option<i32>,
    pub author: Option<String>,
    pub tags: Vec<String>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
}

impl From<&Recipe> for RecipeCard {
    fn from(recipe: &Recipe) -> Self {
        Self {
            id: recipe.id,
            name: recipe.name.clone(),
            image: recipe.image.clone(),
            cooking_time: recipe.cooking_time,
            author: recipe.author.as_ref().map(|author| author.display_name()),
            tags: recipe.tags.iter().map(|tag| tag.name.clone()).collect(),
            is_favorited: recipe.is_favorited,
            is_in_shopping_cart: recipe.is_in_shopping_cart,
        }
    }
}

/// Everything a listing page shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageView {
    pub kind: PageKind,
    pub title: String,
    pub description: String,
    /// Tag checkboxes; absent on pages without a tag filter
    pub tag_filter: Option<Vec<TagFilter>>,
    pub cards: Vec<RecipeCard>,
    pub pagination: PaginationView,
}

impl PageView {
    pub fn render(kind: PageKind, state: &ListState) -> Self {
        // An author page is titled with the author's name once recipes are in
        let author = match kind {
            PageKind::Author(_) => state
                .recipes
                .first()
                .and_then(|recipe| recipe.author.as_ref())
                .map(|author| author.display_name()),
            _ => None,
        };
        Self {
            kind,
            title: author.unwrap_or_else(|| kind.title().to_string()),
            description: kind.description().to_string(),
            tag_filter: kind.has_tag_filter().then(|| state.tags.clone()),
            cards: state.recipes.iter().map(RecipeCard::from).collect(),
            pagination: PaginationView::new(state.recipes_count, state.recipes_page),
        }
    }
}
