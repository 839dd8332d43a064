//! Board HTTP Handlers
//!
//! Thin adapters from HTTP to [`BoardService`]. Every handler takes the caller
//! from [`AuthenticatedUser`] and returns the service's result as JSON; failures
//! render through `BackendError`'s `IntoResponse`.
//!
//! Mutations run on their own task, so a client that hangs up mid-request
//! cannot cancel a unit of work between its commit and its events.

use std::future::Future;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::backend::error::BackendError;
use crate::backend::middleware::AuthenticatedUser;
use crate::backend::service::BoardService;
use crate::backend::storage::StorageError;
use crate::shared::board::{Board, BoardDetails, BoardList, BoardMembership, Card, MemberSummary};
use crate::shared::patch::{
    BoardPatch, CardPatch, InvitationAnswer, InviteMember, ListPatch, MoveCard, NewBoard, NewCard,
    NewList, ReorderList,
};

type Created<T> = Result<(StatusCode, Json<T>), BackendError>;

/// Run a mutation to completion even if the request future is dropped.
async fn detached<T, F>(operation: &'static str, work: F) -> Result<T, BackendError>
where
    F: Future<Output = Result<T, BackendError>> + Send + 'static,
    T: Send + 'static,
{
    tokio::spawn(work).await.map_err(|e| {
        tracing::error!("[Api] {} task did not complete: {}", operation, e);
        BackendError::StorageFailure(StorageError::Backend(format!("{operation} aborted")))
    })?
}

// Boards

/// POST /api/boards
pub async fn create_board(
    AuthenticatedUser { user_id }: AuthenticatedUser,
    State(service): State<BoardService>,
    Json(input): Json<NewBoard>,
) -> Created<Board> {
    let board = detached("create_board", async move { service.create_board(user_id, input).await }).await?;
    tracing::info!("[Api] User {} created board {}", user_id, board.id);
    Ok((StatusCode::CREATED, Json(board)))
}

/// GET /api/boards
pub async fn list_boards(
    AuthenticatedUser { user_id }: AuthenticatedUser,
    State(service): State<BoardService>,
) -> Result<Json<Vec<Board>>, BackendError> {
    Ok(Json(service.boards_for_user(user_id).await?))
}

/// GET /api/boards/{board_id}
pub async fn get_board(
    AuthenticatedUser { user_id }: AuthenticatedUser,
    State(service): State<BoardService>,
    Path(board_id): Path<Uuid>,
) -> Result<Json<BoardDetails>, BackendError> {
    Ok(Json(service.board_details(user_id, board_id).await?))
}

/// PATCH /api/boards/{board_id}
pub async fn update_board(
    AuthenticatedUser { user_id }: AuthenticatedUser,
    State(service): State<BoardService>,
    Path(board_id): Path<Uuid>,
    Json(patch): Json<BoardPatch>,
) -> Result<Json<Board>, BackendError> {
    let board = detached("update_board", async move {
        service.update_board(user_id, board_id, patch).await
    })
    .await?;
    Ok(Json(board))
}

/// DELETE /api/boards/{board_id}
pub async fn delete_board(
    AuthenticatedUser { user_id }: AuthenticatedUser,
    State(service): State<BoardService>,
    Path(board_id): Path<Uuid>,
) -> Result<StatusCode, BackendError> {
    detached("delete_board", async move { service.delete_board(user_id, board_id).await }).await?;
    tracing::info!("[Api] User {} deleted board {}", user_id, board_id);
    Ok(StatusCode::NO_CONTENT)
}

// Lists

/// POST /api/boards/{board_id}/lists
pub async fn create_list(
    AuthenticatedUser { user_id }: AuthenticatedUser,
    State(service): State<BoardService>,
    Path(board_id): Path<Uuid>,
    Json(input): Json<NewList>,
) -> Created<BoardList> {
    let list = detached("create_list", async move {
        service.create_list(user_id, board_id, input).await
    })
    .await?;
    Ok((StatusCode::CREATED, Json(list)))
}

/// GET /api/boards/{board_id}/lists
pub async fn board_lists(
    AuthenticatedUser { user_id }: AuthenticatedUser,
    State(service): State<BoardService>,
    Path(board_id): Path<Uuid>,
) -> Result<Json<Vec<BoardList>>, BackendError> {
    Ok(Json(service.board_lists(user_id, board_id).await?))
}

/// PATCH /api/boards/{board_id}/lists/{list_id}
pub async fn update_list(
    AuthenticatedUser { user_id }: AuthenticatedUser,
    State(service): State<BoardService>,
    Path((board_id, list_id)): Path<(Uuid, Uuid)>,
    Json(patch): Json<ListPatch>,
) -> Result<Json<BoardList>, BackendError> {
    let list = detached("update_list", async move {
        service.update_list(user_id, board_id, list_id, patch).await
    })
    .await?;
    Ok(Json(list))
}

/// DELETE /api/boards/{board_id}/lists/{list_id}
pub async fn delete_list(
    AuthenticatedUser { user_id }: AuthenticatedUser,
    State(service): State<BoardService>,
    Path((board_id, list_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, BackendError> {
    detached("delete_list", async move {
        service.delete_list(user_id, board_id, list_id).await
    })
    .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PATCH /api/boards/{board_id}/lists/{list_id}/reorder
pub async fn reorder_list(
    AuthenticatedUser { user_id }: AuthenticatedUser,
    State(service): State<BoardService>,
    Path((board_id, list_id)): Path<(Uuid, Uuid)>,
    Json(body): Json<ReorderList>,
) -> Result<Json<BoardList>, BackendError> {
    let list = detached("reorder_list", async move {
        service.reorder_list(user_id, board_id, list_id, body.new_position).await
    })
    .await?;
    Ok(Json(list))
}

// Cards

/// POST /api/lists/{list_id}/cards
pub async fn create_card(
    AuthenticatedUser { user_id }: AuthenticatedUser,
    State(service): State<BoardService>,
    Path(list_id): Path<Uuid>,
    Json(input): Json<NewCard>,
) -> Created<Card> {
    let card = detached("create_card", async move {
        service.create_card(user_id, list_id, input).await
    })
    .await?;
    Ok((StatusCode::CREATED, Json(card)))
}

/// GET /api/lists/{list_id}/cards
pub async fn list_cards(
    AuthenticatedUser { user_id }: AuthenticatedUser,
    State(service): State<BoardService>,
    Path(list_id): Path<Uuid>,
) -> Result<Json<Vec<Card>>, BackendError> {
    Ok(Json(service.list_cards(user_id, list_id).await?))
}

/// PATCH /api/cards/{card_id}
pub async fn update_card(
    AuthenticatedUser { user_id }: AuthenticatedUser,
    State(service): State<BoardService>,
    Path(card_id): Path<Uuid>,
    Json(patch): Json<CardPatch>,
) -> Result<Json<Card>, BackendError> {
    let card = detached("update_card", async move {
        service.update_card(user_id, card_id, patch).await
    })
    .await?;
    Ok(Json(card))
}

/// DELETE /api/cards/{card_id}
pub async fn delete_card(
    AuthenticatedUser { user_id }: AuthenticatedUser,
    State(service): State<BoardService>,
    Path(card_id): Path<Uuid>,
) -> Result<StatusCode, BackendError> {
    detached("delete_card", async move { service.delete_card(user_id, card_id).await }).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PATCH /api/cards/{card_id}/move
pub async fn move_card(
    AuthenticatedUser { user_id }: AuthenticatedUser,
    State(service): State<BoardService>,
    Path(card_id): Path<Uuid>,
    Json(body): Json<MoveCard>,
) -> Result<Json<Card>, BackendError> {
    let card = detached("move_card", async move {
        service
            .move_card(user_id, card_id, body.new_list_id, body.new_position)
            .await
    })
    .await?;
    Ok(Json(card))
}

// Members

/// POST /api/boards/{board_id}/invite
pub async fn invite_member(
    AuthenticatedUser { user_id }: AuthenticatedUser,
    State(service): State<BoardService>,
    Path(board_id): Path<Uuid>,
    Json(body): Json<InviteMember>,
) -> Created<BoardMembership> {
    let membership = detached("invite_member", async move {
        service.invite_member(user_id, board_id, &body.email).await
    })
    .await?;
    tracing::info!("[Api] User {} invited {} to board {}", user_id, membership.user_id, board_id);
    Ok((StatusCode::CREATED, Json(membership)))
}

/// POST /api/boards/{board_id}/invite/respond
pub async fn respond_to_invitation(
    AuthenticatedUser { user_id }: AuthenticatedUser,
    State(service): State<BoardService>,
    Path(board_id): Path<Uuid>,
    Json(body): Json<InvitationAnswer>,
) -> Result<Json<BoardMembership>, BackendError> {
    let membership = detached("respond_to_invitation", async move {
        service.respond_to_invitation(user_id, board_id, body.status).await
    })
    .await?;
    Ok(Json(membership))
}

/// GET /api/boards/{board_id}/members
pub async fn board_members(
    AuthenticatedUser { user_id }: AuthenticatedUser,
    State(service): State<BoardService>,
    Path(board_id): Path<Uuid>,
) -> Result<Json<Vec<MemberSummary>>, BackendError> {
    Ok(Json(service.board_members(user_id, board_id).await?))
}

/// GET /api/invitations/pending
pub async fn pending_invitations(
    AuthenticatedUser { user_id }: AuthenticatedUser,
    State(service): State<BoardService>,
) -> Result<Json<Vec<BoardMembership>>, BackendError> {
    Ok(Json(service.pending_invitations(user_id).await?))
}
