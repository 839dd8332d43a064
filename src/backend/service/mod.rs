//! Board Service
//!
//! Every board mutation runs the same way: open a unit of work, check
//! preconditions, write (moving positions through the ledger where needed),
//! commit, and only then emit events. Events are staged in an [`Outbox`] while
//! the unit of work is open and dropped unsent if anything fails, so a
//! rolled-back mutation is never observed by live connections.
//!
//! Commit and delivery of a non-empty outbox happen under one emit lock, so
//! events reach every connection in the order their units of work committed.
//!
//! # Module Structure
//!
//! ```text
//! service/
//! ├── mod.rs      - BoardService, Outbox, commit-then-emit, access checks
//! ├── boards.rs   - Board CRUD and board snapshots
//! ├── lists.rs    - List create/update/delete/reorder
//! ├── cards.rs    - Card create/update/delete/move
//! └── members.rs  - Invitations, membership and live connections
//! ```

use std::sync::Arc;

use tokio::sync::Mutex;
use uuid::Uuid;

use crate::backend::error::{BackendError, Resource};
use crate::backend::realtime::BroadcastRegistry;
use crate::backend::storage::{BoardStore, UnitOfWork};
use crate::shared::board::{Board, BoardList, Card, InvitationStatus};
use crate::shared::event::BoardEvent;

mod boards;
mod cards;
mod lists;
mod members;

/// Event waiting for its unit of work to commit
#[derive(Debug)]
enum Dispatch {
    Board(Uuid, BoardEvent),
    User(Uuid, BoardEvent),
}

/// Events staged during a unit of work, delivered after commit.
#[derive(Debug, Default)]
pub struct Outbox {
    pending: Vec<Dispatch>,
}

impl Outbox {
    /// Stage a broadcast to every observer of `board_id`.
    pub fn broadcast(&mut self, board_id: Uuid, event: BoardEvent) {
        self.pending.push(Dispatch::Board(board_id, event));
    }

    /// Stage a personal notification to `user_id`.
    pub fn notify(&mut self, user_id: Uuid, event: BoardEvent) {
        self.pending.push(Dispatch::User(user_id, event));
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Deliver staged events in the order they were staged.
    async fn flush(self, registry: &BroadcastRegistry) {
        for dispatch in self.pending {
            match dispatch {
                Dispatch::Board(board_id, event) => {
                    registry.broadcast(board_id, event).await;
                }
                Dispatch::User(user_id, event) => {
                    registry.notify(user_id, event).await;
                }
            }
        }
    }
}

/// Board operations over a store and a broadcast registry
#[derive(Clone)]
pub struct BoardService {
    store: Arc<dyn BoardStore>,
    registry: Arc<BroadcastRegistry>,
    emit_order: Arc<Mutex<()>>,
}

impl BoardService {
    pub fn new(store: Arc<dyn BoardStore>, registry: Arc<BroadcastRegistry>) -> Self {
        Self {
            store,
            registry,
            emit_order: Arc::new(Mutex::new(())),
        }
    }

    pub fn registry(&self) -> &Arc<BroadcastRegistry> {
        &self.registry
    }

    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, BackendError> {
        self.store.begin().await.map_err(|e| {
            tracing::error!("[Service] Failed to open unit of work: {}", e);
            BackendError::from(e)
        })
    }

    /// Commit and emit on success, roll back and drop the outbox on failure.
    async fn finish<T>(
        &self,
        operation: &'static str,
        mut uow: Box<dyn UnitOfWork>,
        outbox: Outbox,
        result: Result<T, BackendError>,
    ) -> Result<T, BackendError> {
        match result {
            Ok(value) => {
                if outbox.is_empty() {
                    self.commit(operation, uow.as_mut()).await?;
                    return Ok(value);
                }
                // Held across commit and flush: the next unit of work cannot
                // publish until this one's events are queued everywhere.
                let _order = self.emit_order.lock().await;
                self.commit(operation, uow.as_mut()).await?;
                tracing::debug!("[Service] {} committed, emitting {} events", operation, outbox.len());
                outbox.flush(&self.registry).await;
                Ok(value)
            }
            Err(err) => {
                if let Err(e) = uow.rollback().await {
                    tracing::error!("[Service] {} rollback failed: {}", operation, e);
                }
                match &err {
                    BackendError::StorageFailure(e) => {
                        tracing::error!("[Service] {} rolled back: {}", operation, e)
                    }
                    other => tracing::debug!("[Service] {} rejected: {}", operation, other),
                }
                Err(err)
            }
        }
    }

    /// Commit, rolling back if the store refuses.
    async fn commit(&self, operation: &'static str, uow: &mut dyn UnitOfWork) -> Result<(), BackendError> {
        if let Err(e) = uow.commit().await {
            tracing::error!("[Service] {} failed to commit: {}", operation, e);
            if let Err(e) = uow.rollback().await {
                tracing::error!("[Service] {} rollback failed: {}", operation, e);
            }
            return Err(e.into());
        }
        Ok(())
    }
}

/// The board, if `user_id` owns it or has accepted an invitation to it.
async fn accessible_board(
    uow: &mut dyn UnitOfWork,
    board_id: Uuid,
    user_id: Uuid,
) -> Result<Option<Board>, BackendError> {
    let Some(board) = uow.board(board_id).await? else {
        return Ok(None);
    };
    if board.owner_id == user_id {
        return Ok(Some(board));
    }
    let accepted = uow
        .membership(board_id, user_id)
        .await?
        .is_some_and(|m| m.status == InvitationStatus::Accepted);
    Ok(accepted.then_some(board))
}

/// Board visible to `user_id`, or `NotFound(Board)`.
async fn visible_board(
    uow: &mut dyn UnitOfWork,
    board_id: Uuid,
    user_id: Uuid,
) -> Result<Board, BackendError> {
    accessible_board(uow, board_id, user_id)
        .await?
        .ok_or(BackendError::not_found(Resource::Board))
}

/// Board owned by `user_id`. Members who are not the owner get
/// `PermissionDenied`; everyone else gets `NotFound(Board)`.
async fn owned_board(
    uow: &mut dyn UnitOfWork,
    board_id: Uuid,
    user_id: Uuid,
    action: &str,
) -> Result<Board, BackendError> {
    let board = visible_board(uow, board_id, user_id).await?;
    if board.owner_id != user_id {
        return Err(BackendError::permission_denied(format!(
            "Only the board owner can {action}"
        )));
    }
    Ok(board)
}

/// List `list_id` on `board_id`, or `NotFound(List)`.
async fn list_on_board(
    uow: &mut dyn UnitOfWork,
    board_id: Uuid,
    list_id: Uuid,
) -> Result<BoardList, BackendError> {
    uow.list(list_id)
        .await?
        .filter(|list| list.board_id == board_id)
        .ok_or(BackendError::not_found(Resource::List))
}

/// List `list_id` if its board is visible to `user_id`, else `NotFound(List)`.
async fn visible_list(
    uow: &mut dyn UnitOfWork,
    list_id: Uuid,
    user_id: Uuid,
) -> Result<BoardList, BackendError> {
    let Some(list) = uow.list(list_id).await? else {
        return Err(BackendError::not_found(Resource::List));
    };
    match accessible_board(uow, list.board_id, user_id).await? {
        Some(_) => Ok(list),
        None => Err(BackendError::not_found(Resource::List)),
    }
}

/// Card `card_id` with its list if visible to `user_id`, else `NotFound(Card)`.
async fn visible_card(
    uow: &mut dyn UnitOfWork,
    card_id: Uuid,
    user_id: Uuid,
) -> Result<(Card, BoardList), BackendError> {
    let hidden = || BackendError::not_found(Resource::Card);
    let card = uow.card(card_id).await?.ok_or_else(hidden)?;
    let list = uow.list(card.list_id).await?.ok_or_else(hidden)?;
    match accessible_board(uow, list.board_id, user_id).await? {
        Some(_) => Ok((card, list)),
        None => Err(hidden()),
    }
}
