use std::sync::Arc;

use anyhow::Result;
use serde::Serialize;
use tokio::sync::Mutex;

use crate::client::{Subscription, SubscriptionApi, PAGE_SIZE};
use crate::pages::PaginationView;
use crate::view_model::{FetchOutcome, Tickets};

/// How many recipes to preview under each followed author.
pub const RECIPES_PREVIEW: u32 = 3;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubscriptionsState {
    pub subscriptions: Vec<Subscription>,
    pub count: i32,
    pub page: u32,
}

impl Default for SubscriptionsState {
    fn default() -> Self {
        Self {
            subscriptions: Vec::new(),
            count: 0,
            page: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubscriptionsView {
    pub title: String,
    pub subscriptions: Vec<Subscription>,
    pub pagination: PaginationView,
}

struct Shared {
    state: SubscriptionsState,
    tickets: Tickets,
}

/// Paginated list of the authors the user follows.
pub struct SubscriptionsPage<A: SubscriptionApi> {
    api: Arc<A>,
    shared: Arc<Mutex<Shared>>,
}

impl<A: SubscriptionApi> Clone for SubscriptionsPage<A> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<A: SubscriptionApi> SubscriptionsPage<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self {
            api,
            shared: Arc::new(Mutex::new(Shared {
                state: SubscriptionsState::default(),
                tickets: Tickets::default(),
            })),
        }
    }

    pub async fn mount(&self) -> Result<FetchOutcome> {
        tracing::info!("Mounting Subscriptions page");
        self.refresh().await
    }

    pub async fn state(&self) -> SubscriptionsState {
        self.shared.lock().await.state.clone()
    }

    pub async fn view(&self) -> SubscriptionsView {
        let state = self.state().await;
        SubscriptionsView {
            title: "Subscriptions".to_string(),
            pagination: PaginationView::new(state.count, state.page),
            subscriptions: state.subscriptions,
        }
    }

    pub async fn refresh(&self) -> Result<FetchOutcome> {
        let (ticket, page) = {
            let mut shared = self.shared.lock().await;
            (shared.tickets.issue(), shared.state.page)
        };

        let response = self
            .api
            .get_subscriptions(page, PAGE_SIZE, RECIPES_PREVIEW)
            .await
            .map_err(|e| {
                tracing::warn!("Failed to fetch page {} of subscriptions: {}", page, e);
                e
            })?;

        let mut shared = self.shared.lock().await;
        if !shared.tickets.accept(ticket) {
            return Ok(FetchOutcome::Superseded);
        }
        shared.state.subscriptions = response.results;
        shared.state.count = response.count;
        Ok(FetchOutcome::Applied)
    }

    pub async fn set_page(&self, page: u32) -> Result<FetchOutcome> {
        anyhow::ensure!(page >= 1, "Page numbers start at 1, got {}", page);

        self.shared.lock().await.state.page = page;
        self.refresh().await
    }

    /// Stop following `author_id`, then reload the current page so the
    /// following authors move up.
    pub async fn handle_unsubscribe(&self, author_id: i32) -> Result<FetchOutcome> {
        let listed = self
            .shared
            .lock()
            .await
            .state
            .subscriptions
            .iter()
            .any(|subscription| subscription.author.id == author_id);
        anyhow::ensure!(listed, "Author {} is not on the current page", author_id);

        self.api.unsubscribe(author_id).await.map_err(|e| {
            tracing::warn!("Failed to unsubscribe from author {}: {}", author_id, e);
            e
        })?;

        self.refresh().await
    }
}
