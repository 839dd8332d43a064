/**
 * Server Initialization
 *
 * Wires the store, the broadcast registry and the board service together and
 * hands the resulting state to the router.
 *
 * # Initialization Steps
 *
 * 1. Create the broadcast registry with the configured send timeout
 * 2. Create the board service over the store
 * 3. Build the router with tracing and all routes
 */

use std::sync::Arc;

use axum::Router;

use crate::backend::realtime::BroadcastRegistry;
use crate::backend::routes::router::create_router;
use crate::backend::server::state::AppState;
use crate::backend::service::BoardService;
use crate::backend::storage::{BoardStore, MemoryStore};
use crate::shared::config::AppConfig;

/// Create the application backed by a fresh in-memory store.
pub async fn create_app(config: AppConfig) -> Router<()> {
    create_app_with_store(config, Arc::new(MemoryStore::new())).await
}

/// Create the application over an existing store.
pub async fn create_app_with_store(config: AppConfig, store: Arc<dyn BoardStore>) -> Router<()> {
    tracing::info!("Initializing kanflow backend server");

    let registry = Arc::new(BroadcastRegistry::new(config.send_timeout));
    let service = BoardService::new(store, registry);
    tracing::info!(
        "Broadcast registry ready (send timeout {:?}, buffer {})",
        config.send_timeout,
        config.connection_buffer
    );

    let app = create_router(AppState::new(service, config));
    tracing::info!("Router configured");
    app
}
