use std::future::Future;
use std::sync::Arc;

use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler,
    handler::server::{router::tool::ToolRouter, tool::Parameters},
    model::*,
    schemars,
    service::RequestContext,
    tool, tool_handler, tool_router,
};
use serde_json::json;
use tokio::sync::Mutex;

use crate::client::{FoodgramBackend, FoodgramClient, RecipeQuery};
use crate::navigation::{Navigation, Route};
use crate::pages::{RecipeListPage, SubscriptionsPage};
use crate::view_model::{FetchOutcome, OrdersCounter, TagToggle};

// Parameter structs for tools
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct OpenPageParams {
    /// Route from the navigation, e.g. `/favorites`
    pub href: String,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct SetPageParams {
    /// 1-indexed page number
    pub page: u32,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct ToggleTagParams {
    pub slug: String,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct RecipeParams {
    pub recipe_id: i32,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct AuthorParams {
    pub author_id: i32,
}

/// The page currently shown in a session. Replacing it unmounts the old one.
enum MountedPage<A: FoodgramBackend> {
    Listing(RecipeListPage<A>),
    Subscriptions(SubscriptionsPage<A>),
}

impl<A: FoodgramBackend> Clone for MountedPage<A> {
    fn clone(&self) -> Self {
        match self {
            MountedPage::Listing(page) => MountedPage::Listing(page.clone()),
            MountedPage::Subscriptions(page) => MountedPage::Subscriptions(page.clone()),
        }
    }
}

impl<A: FoodgramBackend> MountedPage<A> {
    async fn render(&self) -> serde_json::Value {
        match self {
            MountedPage::Listing(page) => json!(page.view().await),
            MountedPage::Subscriptions(page) => json!(page.view().await),
        }
    }

    async fn refresh(&self) -> anyhow::Result<FetchOutcome> {
        match self {
            MountedPage::Listing(page) => page.view_model().refresh().await,
            MountedPage::Subscriptions(page) => page.refresh().await,
        }
    }
}

fn success(result: serde_json::Value) -> Result<CallToolResult, McpError> {
    let text = serde_json::to_string_pretty(&result).unwrap_or_else(|_| result.to_string());
    Ok(CallToolResult::success(vec![Content::text(text)]))
}

fn failure(what: &str, details: impl std::fmt::Display) -> Result<CallToolResult, McpError> {
    let error = json!({
        "error": what,
        "details": details.to_string()
    });
    Ok(CallToolResult::error(vec![Content::text(error.to_string())]))
}

/// One MCP session: a browser tab's worth of state.
///
/// Tools mount pages from the navigation and drive the mounted page; every
/// result carries the re-rendered page.
pub struct FoodgramMcpServer<A: FoodgramBackend = FoodgramClient> {
    api: Arc<A>,
    navigation: Arc<Navigation>,
    orders: OrdersCounter,
    page: Arc<Mutex<Option<MountedPage<A>>>>,
    tool_router: ToolRouter<Self>,
}

impl<A: FoodgramBackend> Clone for FoodgramMcpServer<A> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            navigation: Arc::clone(&self.navigation),
            orders: self.orders.clone(),
            page: Arc::clone(&self.page),
            tool_router: self.tool_router.clone(),
        }
    }
}

impl FoodgramMcpServer<FoodgramClient> {
    pub async fn authenticate(&self, email: String, password: String) -> Result<(), anyhow::Error> {
        self.api.authenticate(email, password).await
    }
}

#[tool_router]
impl<A: FoodgramBackend> FoodgramMcpServer<A> {
    pub fn new(api: A, navigation: Arc<Navigation>, orders: OrdersCounter) -> Self {
        Self::with_api(Arc::new(api), navigation, orders)
    }

    /// Session over a backend the caller keeps a handle to.
    pub fn with_api(api: Arc<A>, navigation: Arc<Navigation>, orders: OrdersCounter) -> Self {
        Self {
            api,
            navigation,
            orders,
            page: Arc::new(Mutex::new(None)),
            tool_router: Self::tool_router(),
        }
    }

    pub async fn is_authenticated(&self) -> bool {
        self.api.is_authenticated().await
    }

    pub fn orders(&self) -> &OrdersCounter {
        &self.orders
    }

    /// Seed the cart counter from the server; anonymous sessions have no cart.
    pub async fn sync_orders(&self) -> Result<u32, anyhow::Error> {
        if !self.api.is_authenticated().await {
            self.orders.set(0);
            return Ok(0);
        }

        let query = RecipeQuery {
            is_in_shopping_cart: true,
            ..Default::default()
        };
        let response = self.api.get_recipes(&query).await?;
        let count = u32::try_from(response.count).unwrap_or(0);
        self.orders.set(count);
        tracing::info!("Shopping cart holds {} recipes", count);
        Ok(count)
    }

    async fn current_page(&self) -> Option<MountedPage<A>> {
        self.page.lock().await.clone()
    }

    async fn current_listing(&self) -> Result<RecipeListPage<A>, String> {
        match self.current_page().await {
            Some(MountedPage::Listing(page)) => Ok(page),
            Some(MountedPage::Subscriptions(_)) => Err("The subscriptions page has no recipe cards".to_string()),
            None => Err("No page is open; call open_page first".to_string()),
        }
    }

    #[tool(description = "List the navigation entries available to this session")]
    pub async fn get_navigation(&self) -> Result<CallToolResult, McpError> {
        let authenticated = self.api.is_authenticated().await;
        let result = json!({
            "authenticated": authenticated,
            "items": self.navigation.visible(authenticated),
            "orders": self.orders.get()
        });
        success(result)
    }

    #[tool(description = "Open a page by its navigation href (or /user/{id} for an author) and return its first page of results")]
    pub async fn open_page(
        &self,
        Parameters(params): Parameters<OpenPageParams>,
    ) -> Result<CallToolResult, McpError> {
        let Some(route) = self.navigation.resolve(&params.href) else {
            return failure("Unknown page", format!("No navigation entry for '{}'", params.href));
        };

        let needs_auth = self
            .navigation
            .find(&params.href)
            .map(|item| item.auth)
            .unwrap_or(false);
        if needs_auth && !self.api.is_authenticated().await {
            return failure("Login required", format!("'{}' is only available to logged-in users", params.href));
        }

        let page = match route {
            Route::Listing(kind) => MountedPage::Listing(RecipeListPage::new(
                kind,
                Arc::clone(&self.api),
                self.orders.clone(),
            )),
            Route::Subscriptions => MountedPage::Subscriptions(SubscriptionsPage::new(Arc::clone(&self.api))),
            Route::Other => {
                return failure("Not a listing page", format!("'{}' cannot be opened here", params.href));
            }
        };

        *self.page.lock().await = Some(page.clone());

        let mounted = match &page {
            MountedPage::Listing(listing) => listing.mount().await,
            MountedPage::Subscriptions(subscriptions) => subscriptions.mount().await,
        };

        match mounted {
            Ok(_) => success(json!({ "href": params.href, "page": page.render().await })),
            Err(e) => failure("Failed to load page", e),
        }
    }

    #[tool(description = "Show the currently open page")]
    pub async fn view_page(&self) -> Result<CallToolResult, McpError> {
        match self.current_page().await {
            Some(page) => success(json!({ "page": page.render().await })),
            None => failure("No page is open", "call open_page first"),
        }
    }

    #[tool(description = "Go to another page of the current listing")]
    pub async fn set_page(
        &self,
        Parameters(params): Parameters<SetPageParams>,
    ) -> Result<CallToolResult, McpError> {
        let Some(page) = self.current_page().await else {
            return failure("No page is open", "call open_page first");
        };

        let result = match &page {
            MountedPage::Listing(listing) => listing.set_page(params.page).await,
            MountedPage::Subscriptions(subscriptions) => subscriptions.set_page(params.page).await,
        };

        match result {
            Ok(outcome) => success(json!({
                "superseded": outcome == FetchOutcome::Superseded,
                "page": page.render().await
            })),
            Err(e) => failure("Failed to change page", e),
        }
    }

    #[tool(description = "Turn a tag filter of the current listing on or off")]
    pub async fn toggle_tag(
        &self,
        Parameters(params): Parameters<ToggleTagParams>,
    ) -> Result<CallToolResult, McpError> {
        let page = match self.current_listing().await {
            Ok(page) => page,
            Err(reason) => return failure("Failed to toggle tag", reason),
        };

        match page.toggle_tag(&params.slug).await {
            Ok(TagToggle::Toggled { active, .. }) => success(json!({
                "slug": params.slug,
                "active": active,
                "page": page.view().await
            })),
            Ok(TagToggle::Unknown) => success(json!({
                "slug": params.slug,
                "message": format!("No tag '{}'; filters unchanged", params.slug),
                "page": page.view().await
            })),
            Err(e) => failure("Failed to toggle tag", e),
        }
    }

    #[tool(description = "Add a recipe on the current page to favorites, or remove it")]
    pub async fn toggle_favorite(
        &self,
        Parameters(params): Parameters<RecipeParams>,
    ) -> Result<CallToolResult, McpError> {
        let page = match self.current_listing().await {
            Ok(page) => page,
            Err(reason) => return failure("Failed to update favorites", reason),
        };

        match page.toggle_favorite(params.recipe_id).await {
            Ok(is_favorited) => success(json!({
                "recipe_id": params.recipe_id,
                "is_favorited": is_favorited,
                "page": page.view().await
            })),
            Err(e) => failure("Failed to update favorites", e),
        }
    }

    #[tool(description = "Add a recipe on the current page to the shopping list, or remove it")]
    pub async fn toggle_cart(
        &self,
        Parameters(params): Parameters<RecipeParams>,
    ) -> Result<CallToolResult, McpError> {
        let page = match self.current_listing().await {
            Ok(page) => page,
            Err(reason) => return failure("Failed to update shopping list", reason),
        };

        match page.toggle_cart(params.recipe_id).await {
            Ok(is_in_shopping_cart) => success(json!({
                "recipe_id": params.recipe_id,
                "is_in_shopping_cart": is_in_shopping_cart,
                "orders": self.orders.get(),
                "page": page.view().await
            })),
            Err(e) => failure("Failed to update shopping list", e),
        }
    }

    #[tool(description = "Stop following an author shown on the subscriptions page")]
    pub async fn unsubscribe(
        &self,
        Parameters(params): Parameters<AuthorParams>,
    ) -> Result<CallToolResult, McpError> {
        let page = match self.current_page().await {
            Some(MountedPage::Subscriptions(page)) => page,
            _ => return failure("Failed to unsubscribe", "Open /subscriptions first"),
        };

        match page.handle_unsubscribe(params.author_id).await {
            Ok(_) => success(json!({
                "author_id": params.author_id,
                "page": page.view().await
            })),
            Err(e) => failure("Failed to unsubscribe", e),
        }
    }

    #[tool(description = "Follow an author; the open page is reloaded to show the new subscription")]
    pub async fn subscribe(
        &self,
        Parameters(params): Parameters<AuthorParams>,
    ) -> Result<CallToolResult, McpError> {
        let subscription = match self.api.subscribe(params.author_id).await {
            Ok(subscription) => subscription,
            Err(e) => {
                tracing::warn!("Failed to subscribe to author {}: {}", params.author_id, e);
                return failure("Failed to subscribe", e);
            }
        };

        let page = match self.current_page().await {
            Some(page) => {
                if let Err(e) = page.refresh().await {
                    tracing::warn!("Subscribed, but the open page could not be reloaded: {}", e);
                }
                page.render().await
            }
            None => serde_json::Value::Null,
        };

        success(json!({
            "author_id": params.author_id,
            "author": subscription.author.display_name(),
            "recipes_count": subscription.recipes_count,
            "page": page
        }))
    }

    #[tool(description = "Show one recipe with its ingredients and instructions")]
    pub async fn view_recipe(
        &self,
        Parameters(params): Parameters<RecipeParams>,
    ) -> Result<CallToolResult, McpError> {
        match self.api.get_recipe(params.recipe_id).await {
            Ok(recipe) => success(json!(recipe)),
            Err(e) => {
                tracing::warn!("Failed to load recipe {}: {}", params.recipe_id, e);
                failure("Failed to load recipe", e)
            }
        }
    }

    #[tool(description = "Download the aggregated ingredient list for every recipe in the shopping list")]
    pub async fn download_shopping_list(&self) -> Result<CallToolResult, McpError> {
        match self.api.download_shopping_cart().await {
            Ok(text) => Ok(CallToolResult::success(vec![Content::text(text)])),
            Err(e) => failure("Failed to download shopping list", e),
        }
    }
}

#[tool_handler]
impl<A: FoodgramBackend> ServerHandler for FoodgramMcpServer<A> {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .build(),
            server_info: Implementation::from_build_env(),
            instructions: Some("This server browses a Foodgram recipe site. Call get_navigation to see the available pages, open_page to mount one, then set_page, toggle_tag, toggle_favorite and toggle_cart to interact with it. Authors are followed with subscribe and unfollowed with unsubscribe. Every tool returns the re-rendered page.".to_string()),
        }
    }

    async fn initialize(
        &self,
        _request: InitializeRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<InitializeResult, McpError> {
        Ok(self.get_info())
    }
}
