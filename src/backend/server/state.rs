/**
 * Application State
 *
 * `AppState` is the single state container handed to the Axum router. It is
 * cheap to clone: the service shares its store and registry through `Arc`s
 * and the configuration is shared read-only.
 *
 * The `FromRef` implementations let handlers extract just the part they need:
 *
 * ```rust,no_run
 * use axum::extract::State;
 * use kanflow::backend::service::BoardService;
 *
 * async fn handler(State(service): State<BoardService>) {
 *     let _ = service.registry().group_count();
 * }
 * ```
 */

use std::sync::Arc;

use axum::extract::FromRef;

use crate::backend::service::BoardService;
use crate::shared::config::AppConfig;

/// Shared state for every request handler
#[derive(Clone)]
pub struct AppState {
    /// Board operations and live connection management
    pub service: BoardService,

    /// Runtime configuration the server was started with
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(service: BoardService, config: AppConfig) -> Self {
        Self {
            service,
            config: Arc::new(config),
        }
    }
}

impl FromRef<AppState> for BoardService {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.service.clone()
    }
}

impl FromRef<AppState> for Arc<AppConfig> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.config.clone()
    }
}
