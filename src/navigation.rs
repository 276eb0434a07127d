//! Top-level navigation: which routes exist and which need a logged-in user.
//!
//! The list is built once at startup and handed to whoever renders or routes
//! with it.

use serde::Serialize;

use crate::pages::PageKind;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavItem {
    pub title: String,
    pub href: String,
    /// Route requires an authenticated session
    pub auth: bool,
}

impl NavItem {
    pub fn new(title: &str, href: &str, auth: bool) -> Self {
        Self {
            title: title.to_string(),
            href: href.to_string(),
            auth,
        }
    }
}

/// Where an href leads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Listing(PageKind),
    Subscriptions,
    /// Known route that is not a listing page (e.g. the recipe form)
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    items: Vec<NavItem>,
}

impl Default for Navigation {
    fn default() -> Self {
        Self::new(vec![
            NavItem::new("Recipes", "/recipes", false),
            NavItem::new("Subscriptions", "/subscriptions", true),
            NavItem::new("Create recipe", "/recipes/create", true),
            NavItem::new("Favorite", "/favorites", true),
            NavItem::new("Shopping list", "/cart", true),
        ])
    }
}

impl Navigation {
    pub fn new(items: Vec<NavItem>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[NavItem] {
        &self.items
    }

    /// Entries to show for a session; anonymous users only see public routes.
    pub fn visible(&self, authenticated: bool) -> Vec<&NavItem> {
        self.items
            .iter()
            .filter(|item| authenticated || !item.auth)
            .collect()
    }

    pub fn find(&self, href: &str) -> Option<&NavItem> {
        let href = normalize(href);
        self.items.iter().find(|item| normalize(&item.href) == href)
    }

    /// Resolve an href to its page: the configured entries plus `/user/{id}`
    /// author pages. Unknown hrefs yield `None`.
    pub fn resolve(&self, href: &str) -> Option<Route> {
        if let Some(author_id) = author_page(href) {
            return Some(Route::Listing(PageKind::Author(author_id)));
        }

        let item = self.find(href)?;
        let route = match normalize(&item.href) {
            "/recipes" => Route::Listing(PageKind::Recipes),
            "/favorites" => Route::Listing(PageKind::Favorites),
            "/cart" => Route::Listing(PageKind::ShoppingCart),
            "/subscriptions" => Route::Subscriptions,
            _ => Route::Other,
        };
        Some(route)
    }
}

fn author_page(href: &str) -> Option<i32> {
    normalize(href).strip_prefix("/user/")?.parse().ok()
}

fn normalize(href: &str) -> &str {
    let trimmed = href.trim_end_matches('/');
    if trimmed.is_empty() {
        "/"
    } else {
        trimmed
    }
}
