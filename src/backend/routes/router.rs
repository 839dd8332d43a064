/**
 * Router Configuration
 *
 * Combines all routes into a single Axum router.
 *
 * # Routes
 *
 * - `GET /ws/board/{board_id}` - live events for one board
 * - `GET /ws/user` - personal notifications for the caller
 * - `GET /health` - liveness check
 * - `/api/...` - board, list, card and member endpoints (see `api_routes`)
 *
 * Every request is traced through `tower_http::trace::TraceLayer`.
 */

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::backend::realtime::{handle_board_socket, handle_user_socket};
use crate::backend::routes::api_routes::configure_api_routes;
use crate::backend::server::state::AppState;

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState) -> Router<()> {
    let router = Router::new()
        .route("/ws/board/{board_id}", get(handle_board_socket))
        .route("/ws/user", get(handle_user_socket))
        .route("/health", get(health));

    configure_api_routes(router)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

async fn health() -> &'static str {
    "ok"
}
