//! Serve command - Starts the HTTP server.

use std::sync::Arc;

use crate::api::{create_router, AppState};
use crate::cli::args::ServeArgs;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::infra::{Cache, Culture, FlashStore, MemoryFlashStore, RedisFlashStore, ResourceLocalizer};

/// Execute the serve command
pub async fn execute(args: ServeArgs, config: Config) -> AppResult<()> {
    tracing::info!("Starting server...");

    // Localization resources
    let localizer = ResourceLocalizer::load(&config.locales_dir, Culture::new(config.default_culture.clone()))?;
    tracing::info!(cultures = ?localizer.cultures(), "Localization resources loaded");

    // Flash store: Redis when configured, process memory otherwise
    let (flash_store, cache): (Arc<dyn FlashStore>, Option<Arc<Cache>>) = match &config.redis_url {
        Some(url) => {
            let cache = Cache::try_connect(url).await?;
            tracing::info!("Redis flash store connected");
            (Arc::new(RedisFlashStore::new(cache.clone())), Some(Arc::new(cache)))
        }
        None => {
            tracing::warn!("REDIS_URL not set, keeping flash entries in process memory");
            (Arc::new(MemoryFlashStore::new()), None)
        }
    };

    let app_state = AppState::new(config, Arc::new(localizer), flash_store, cache);

    // Build router
    let app = create_router(app_state);

    // Start server
    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind to {}: {}", addr, e)))?;

    tracing::info!("Server running on http://{}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    Ok(())
}
