use std::sync::Arc;

use mcp_foodgram::client::{FoodgramClient, SharedAuth};
use mcp_foodgram::config::Config;
use mcp_foodgram::navigation::Navigation;
use mcp_foodgram::server::FoodgramMcpServer;
use mcp_foodgram::view_model::OrdersCounter;
use rmcp::transport::sse_server::{SseServer, SseServerConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".to_string().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    let auth = SharedAuth::new();
    let navigation = Arc::new(Navigation::default());
    let orders = OrdersCounter::default();

    let startup = FoodgramMcpServer::new(
        FoodgramClient::with_shared_auth(config.base_url.clone(), auth.clone()),
        Arc::clone(&navigation),
        orders.clone(),
    );

    match &config.credentials {
        Some(credentials) => {
            tracing::info!("Validating Foodgram credentials...");
            if let Err(e) = startup
                .authenticate(credentials.email.clone(), credentials.password.clone())
                .await
            {
                tracing::error!("Authentication failed: {}", e);
                tracing::error!("Please verify:");
                tracing::error!("  - FOODGRAM_BASE_URL is correct: {}", config.base_url);
                tracing::error!("  - FOODGRAM_EMAIL is correct: {}", credentials.email);
                tracing::error!("  - FOODGRAM_PASSWORD is correct");
                tracing::error!("  - Foodgram backend is running and accessible");
                std::process::exit(1);
            }

            if let Err(e) = startup.sync_orders().await {
                tracing::warn!("Could not read the shopping cart: {}", e);
                tracing::warn!("The cart counter starts at zero.");
            }
        }
        None => {
            tracing::info!("No FOODGRAM_EMAIL set; sessions browse anonymously");
        }
    }

    // Create server configuration and start SSE server
    let sse_config = SseServerConfig {
        bind: config.bind_addr,
        sse_path: "/sse".to_string(),
        post_path: "/message".to_string(),
        ct: tokio_util::sync::CancellationToken::new(),
        sse_keep_alive: None,
    };

    tracing::info!("Foodgram MCP Server listening on {}", sse_config.bind);

    let sse_server = SseServer::serve_with_config(sse_config).await?;

    // Every session gets its own pages but shares the login and cart counter
    let base_url = config.base_url.clone();
    let ct = sse_server.with_service(move || {
        FoodgramMcpServer::new(
            FoodgramClient::with_shared_auth(base_url.clone(), auth.clone()),
            Arc::clone(&navigation),
            orders.clone(),
        )
    });

    tracing::info!("Foodgram MCP Server started successfully");

    // Wait for Ctrl+C
    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutting down...");
    ct.cancel();

    Ok(())
}
