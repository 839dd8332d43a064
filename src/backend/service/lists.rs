//! List operations
//!
//! Lists are addressed through their board; a list id that belongs to another
//! board is reported as missing.

use uuid::Uuid;

use crate::backend::error::BackendError;
use crate::backend::ledger::{apply_plan, plan_insert, plan_remove, plan_within};
use crate::backend::service::{list_on_board, visible_board, BoardService, Outbox};
use crate::backend::storage::SiblingScope;
use crate::shared::board::BoardList;
use crate::shared::event::BoardEvent;
use crate::shared::patch::{ListPatch, NewList};

impl BoardService {
    /// Create a list at the requested index (clamped to the end), or append it.
    pub async fn create_list(
        &self,
        user_id: Uuid,
        board_id: Uuid,
        input: NewList,
    ) -> Result<BoardList, BackendError> {
        input.validate()?;
        let mut uow = self.begin().await?;
        let mut outbox = Outbox::default();
        let result = async {
            let uow = uow.as_mut();
            visible_board(uow, board_id, user_id).await?;
            let count = uow.lists_ordered(board_id).await?.len();
            let plan = plan_insert(SiblingScope::Lists(board_id), count, input.position)?;
            apply_plan(uow, &plan).await?;

            let list = BoardList::new(board_id, input.title, plan.target);
            uow.insert_list(&list).await?;
            outbox.broadcast(board_id, BoardEvent::list_created(&list));
            Ok::<_, BackendError>(list)
        }
        .await;
        let list = self.finish("create_list", uow, outbox, result).await?;
        tracing::info!("[Service] List {} created on board {} at {}", list.id, board_id, list.position);
        Ok(list)
    }

    /// Lists of a board ordered by position.
    pub async fn board_lists(&self, user_id: Uuid, board_id: Uuid) -> Result<Vec<BoardList>, BackendError> {
        let mut uow = self.begin().await?;
        let result = async {
            let uow = uow.as_mut();
            visible_board(uow, board_id, user_id).await?;
            Ok::<_, BackendError>(uow.lists_ordered(board_id).await?)
        }
        .await;
        self.finish("board_lists", uow, Outbox::default(), result).await
    }

    /// Apply the fields present in `patch`.
    pub async fn update_list(
        &self,
        user_id: Uuid,
        board_id: Uuid,
        list_id: Uuid,
        patch: ListPatch,
    ) -> Result<BoardList, BackendError> {
        patch.validate()?;
        let mut uow = self.begin().await?;
        let mut outbox = Outbox::default();
        let result = async {
            let uow = uow.as_mut();
            visible_board(uow, board_id, user_id).await?;
            let mut list = list_on_board(uow, board_id, list_id).await?;
            if patch.apply_to(&mut list) {
                uow.update_list(&list).await?;
                outbox.broadcast(board_id, BoardEvent::list_updated(&list));
            }
            Ok::<_, BackendError>(list)
        }
        .await;
        self.finish("update_list", uow, outbox, result).await
    }

    /// Delete a list and its cards, closing the gap it leaves.
    pub async fn delete_list(&self, user_id: Uuid, board_id: Uuid, list_id: Uuid) -> Result<(), BackendError> {
        let mut uow = self.begin().await?;
        let mut outbox = Outbox::default();
        let result = async {
            let uow = uow.as_mut();
            visible_board(uow, board_id, user_id).await?;
            let list = list_on_board(uow, board_id, list_id).await?;
            uow.delete_list(list.id).await?;
            apply_plan(uow, &plan_remove(SiblingScope::Lists(board_id), list.position)?).await?;
            outbox.broadcast(board_id, BoardEvent::list_deleted(list.id));
            Ok::<_, BackendError>(())
        }
        .await;
        self.finish("delete_list", uow, outbox, result).await?;
        tracing::info!("[Service] List {} deleted from board {}", list_id, board_id);
        Ok(())
    }

    /// Move a list to `new_position` among its board's lists.
    pub async fn reorder_list(
        &self,
        user_id: Uuid,
        board_id: Uuid,
        list_id: Uuid,
        new_position: i32,
    ) -> Result<BoardList, BackendError> {
        let mut uow = self.begin().await?;
        let mut outbox = Outbox::default();
        let result = async {
            let uow = uow.as_mut();
            visible_board(uow, board_id, user_id).await?;
            let mut list = list_on_board(uow, board_id, list_id).await?;
            let count = uow.lists_ordered(board_id).await?.len();
            let plan = plan_within(SiblingScope::Lists(board_id), count, list.position, new_position)?;
            if plan.is_noop() {
                return Ok::<_, BackendError>(list);
            }

            apply_plan(uow, &plan).await?;
            list.position = plan.target;
            list.updated_at = chrono::Utc::now();
            uow.update_list(&list).await?;
            outbox.broadcast(board_id, BoardEvent::list_reordered(&list));
            Ok::<_, BackendError>(list)
        }
        .await;
        self.finish("reorder_list", uow, outbox, result).await
    }
}
