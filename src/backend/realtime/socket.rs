/**
 * WebSocket Transport
 *
 * Two endpoints feed the broadcast registry:
 *
 * - `GET /ws/board/{board_id}` - joins the board's group once the caller is
 *   known to be the owner or an accepted member
 * - `GET /ws/user` - joins the caller's personal notification subject
 *
 * Each socket is split into a writer task, which drains the connection's
 * event channel into JSON text frames, and a reader task, which only watches
 * for the client going away. Whichever ends first stops the other and the
 * connection is removed from the registry.
 */

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, State,
    },
    response::{IntoResponse, Response},
};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::backend::error::{BackendError, Resource};
use crate::backend::middleware::AuthenticatedUser;
use crate::backend::realtime::ConnectionHandle;
use crate::backend::server::state::AppState;
use crate::backend::service::BoardService;
use crate::shared::config::AppConfig;
use crate::shared::event::BoardEvent;

/// Handle a board subscription (GET /ws/board/{board_id})
///
/// # Errors
///
/// * `401 Unauthorized` - identity header missing or malformed
/// * `404 Not Found` - board missing or not visible to the caller
pub async fn handle_board_socket(
    ws: WebSocketUpgrade,
    Path(board_id): Path<Uuid>,
    AuthenticatedUser { user_id }: AuthenticatedUser,
    State(state): State<AppState>,
) -> Result<Response, BackendError> {
    if !state.service.has_board_access(user_id, board_id).await? {
        tracing::warn!("[Socket] User {} refused on board {}", user_id, board_id);
        return Err(BackendError::not_found(Resource::Board));
    }

    let capacity = state.config.connection_buffer;
    let service = state.service.clone();
    Ok(ws.on_upgrade(move |socket| async move {
        let (handle, rx) = ConnectionHandle::channel(user_id, capacity);
        // Access may have been revoked between the check above and the upgrade.
        if let Err(e) = service.connect_board(board_id, handle.clone()).await {
            tracing::warn!("[Socket] {} dropped after upgrade: {}", handle.id(), e);
            return;
        }
        run_session(socket, service, handle, rx).await;
    }))
}

/// Handle a personal notification subscription (GET /ws/user)
pub async fn handle_user_socket(
    ws: WebSocketUpgrade,
    AuthenticatedUser { user_id }: AuthenticatedUser,
    State(service): State<BoardService>,
    State(config): State<Arc<AppConfig>>,
) -> impl IntoResponse {
    let capacity = config.connection_buffer;
    ws.on_upgrade(move |socket| async move {
        let (handle, rx) = ConnectionHandle::channel(user_id, capacity);
        service.connect_user(handle.clone());
        run_session(socket, service, handle, rx).await;
    })
}

async fn run_session(
    socket: WebSocket,
    service: BoardService,
    handle: ConnectionHandle,
    mut rx: mpsc::Receiver<Arc<BoardEvent>>,
) {
    let conn_id = handle.id();
    // The registry keeps its own clone; ours must not keep the channel open.
    drop(handle);
    let (mut ws_tx, mut ws_rx) = socket.split();

    let mut writer = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            let text = match serde_json::to_string(event.as_ref()) {
                Ok(text) => text,
                Err(e) => {
                    tracing::error!("[Socket] Failed to encode {}: {}", event.event_type.as_str(), e);
                    continue;
                }
            };
            if ws_tx.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
        let _ = ws_tx.close().await;
    });

    let mut reader = tokio::spawn(async move {
        while let Some(message) = ws_rx.next().await {
            match message {
                Ok(Message::Close(_)) | Err(_) => break,
                Ok(_) => {}
            }
        }
    });

    tokio::select! {
        _ = &mut writer => reader.abort(),
        _ = &mut reader => writer.abort(),
    }

    service.disconnect(conn_id);
    tracing::debug!("[Socket] {} session ended", conn_id);
}
