//! Board CRUD and board snapshots. None of these emit events.

use uuid::Uuid;

use crate::backend::error::BackendError;
use crate::backend::service::{owned_board, visible_board, BoardService, Outbox};
use crate::shared::board::{Board, BoardDetails, ListWithCards};
use crate::shared::patch::{BoardPatch, NewBoard};

impl BoardService {
    /// Create a board owned by `owner_id`.
    pub async fn create_board(&self, owner_id: Uuid, input: NewBoard) -> Result<Board, BackendError> {
        input.validate()?;
        let mut uow = self.begin().await?;
        let board = Board::new(input.title, owner_id);
        let result = uow.insert_board(&board).await.map_err(BackendError::from);
        let board = self.finish("create_board", uow, Outbox::default(), result.map(|_| board)).await?;
        tracing::info!("[Service] Board {} created by {}", board.id, owner_id);
        Ok(board)
    }

    /// Boards the user owns or has joined.
    pub async fn boards_for_user(&self, user_id: Uuid) -> Result<Vec<Board>, BackendError> {
        let mut uow = self.begin().await?;
        let result = uow.boards_for_user(user_id).await.map_err(BackendError::from);
        self.finish("boards_for_user", uow, Outbox::default(), result).await
    }

    /// Board with its lists and their cards, all ordered by position.
    pub async fn board_details(&self, user_id: Uuid, board_id: Uuid) -> Result<BoardDetails, BackendError> {
        let mut uow = self.begin().await?;
        let result = async {
            let uow = uow.as_mut();
            let board = visible_board(uow, board_id, user_id).await?;
            let mut lists = Vec::new();
            for list in uow.lists_ordered(board_id).await? {
                let cards = uow.cards_ordered(list.id).await?;
                lists.push(ListWithCards { list, cards });
            }
            Ok::<_, BackendError>(BoardDetails { board, lists })
        }
        .await;
        self.finish("board_details", uow, Outbox::default(), result).await
    }

    /// Rename a board. Owner only.
    pub async fn update_board(
        &self,
        user_id: Uuid,
        board_id: Uuid,
        patch: BoardPatch,
    ) -> Result<Board, BackendError> {
        patch.validate()?;
        let mut uow = self.begin().await?;
        let result = async {
            let uow = uow.as_mut();
            let mut board = owned_board(uow, board_id, user_id, "update the board").await?;
            if patch.apply_to(&mut board) {
                uow.update_board(&board).await?;
            }
            Ok::<_, BackendError>(board)
        }
        .await;
        self.finish("update_board", uow, Outbox::default(), result).await
    }

    /// Delete a board with everything on it. Owner only.
    pub async fn delete_board(&self, user_id: Uuid, board_id: Uuid) -> Result<(), BackendError> {
        let mut uow = self.begin().await?;
        let result = async {
            let uow = uow.as_mut();
            owned_board(uow, board_id, user_id, "delete the board").await?;
            uow.delete_board(board_id).await?;
            Ok::<_, BackendError>(())
        }
        .await;
        self.finish("delete_board", uow, Outbox::default(), result).await?;
        tracing::info!("[Service] Board {} deleted by {}", board_id, user_id);
        Ok(())
    }
}
