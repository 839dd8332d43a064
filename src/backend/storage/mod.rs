//! Storage Module
//!
//! Transactional data access for boards, lists, cards, users and memberships.
//! Every read and write goes through a [`UnitOfWork`] opened by
//! [`BoardStore::begin`]; nothing is visible to other units until `commit`.
//! Dropping a unit without committing discards its writes.
//!
//! # Module Structure
//!
//! ```text
//! storage/
//! ├── mod.rs     - BoardStore / UnitOfWork traits, SiblingScope, StorageError
//! └── memory.rs  - In-process MemoryStore
//! ```

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::shared::board::{Board, BoardList, BoardMembership, Card, InvitationStatus, User};

/// In-process store
pub mod memory;

pub use memory::MemoryStore;

/// An ordered sibling group: the lists of a board or the cards of a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SiblingScope {
    /// Lists of the board with this id
    Lists(Uuid),
    /// Cards of the list with this id
    Cards(Uuid),
}

impl SiblingScope {
    pub fn parent_id(&self) -> Uuid {
        match self {
            SiblingScope::Lists(id) | SiblingScope::Cards(id) => *id,
        }
    }
}

/// Storage-level failures
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// The unit of work was already committed or rolled back
    #[error("unit of work is already finished")]
    Finished,

    /// A row with this id already exists
    #[error("duplicate {kind} {id}")]
    Duplicate { kind: &'static str, id: Uuid },

    /// A write referenced a row that does not exist
    #[error("missing {kind} {id}")]
    Missing { kind: &'static str, id: Uuid },

    /// The underlying backend failed
    #[error("storage backend failure: {0}")]
    Backend(String),
}

/// Opens units of work.
#[async_trait]
pub trait BoardStore: Send + Sync {
    /// Begin a unit of work. Units are isolated from each other for their
    /// whole lifetime; concurrent callers wait here.
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, StorageError>;
}

/// A transaction-scoped view of the store.
#[async_trait]
pub trait UnitOfWork: Send {
    // Boards

    async fn board(&mut self, id: Uuid) -> Result<Option<Board>, StorageError>;

    /// Boards the user owns or has accepted an invitation to
    async fn boards_for_user(&mut self, user_id: Uuid) -> Result<Vec<Board>, StorageError>;

    async fn insert_board(&mut self, board: &Board) -> Result<(), StorageError>;

    async fn update_board(&mut self, board: &Board) -> Result<(), StorageError>;

    /// Delete a board with its lists, cards and memberships
    async fn delete_board(&mut self, id: Uuid) -> Result<bool, StorageError>;

    // Lists

    async fn list(&mut self, id: Uuid) -> Result<Option<BoardList>, StorageError>;

    /// Lists of a board ordered by position
    async fn lists_ordered(&mut self, board_id: Uuid) -> Result<Vec<BoardList>, StorageError>;

    async fn insert_list(&mut self, list: &BoardList) -> Result<(), StorageError>;

    async fn update_list(&mut self, list: &BoardList) -> Result<(), StorageError>;

    /// Delete a list with its cards
    async fn delete_list(&mut self, id: Uuid) -> Result<bool, StorageError>;

    // Cards

    async fn card(&mut self, id: Uuid) -> Result<Option<Card>, StorageError>;

    /// Cards of a list ordered by position
    async fn cards_ordered(&mut self, list_id: Uuid) -> Result<Vec<Card>, StorageError>;

    async fn insert_card(&mut self, card: &Card) -> Result<(), StorageError>;

    async fn update_card(&mut self, card: &Card) -> Result<(), StorageError>;

    async fn delete_card(&mut self, id: Uuid) -> Result<bool, StorageError>;

    /// Add `delta` to the position of every sibling in `scope` whose position
    /// lies in `from..=to`, or `from..` when `to` is `None`, as one write.
    /// Returns the number of rows touched.
    async fn shift_range(
        &mut self,
        scope: SiblingScope,
        from: i32,
        to: Option<i32>,
        delta: i32,
    ) -> Result<usize, StorageError>;

    // Users

    async fn user(&mut self, id: Uuid) -> Result<Option<User>, StorageError>;

    async fn user_by_email(&mut self, email: &str) -> Result<Option<User>, StorageError>;

    // Memberships

    async fn membership(
        &mut self,
        board_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<BoardMembership>, StorageError>;

    /// Insert or replace the row for `(board_id, user_id)`
    async fn upsert_membership(&mut self, membership: &BoardMembership) -> Result<(), StorageError>;

    async fn memberships_by_status(
        &mut self,
        board_id: Uuid,
        status: InvitationStatus,
    ) -> Result<Vec<BoardMembership>, StorageError>;

    /// Pending invitations addressed to a user
    async fn pending_invitations(&mut self, user_id: Uuid) -> Result<Vec<BoardMembership>, StorageError>;

    // Lifecycle

    async fn commit(&mut self) -> Result<(), StorageError>;

    async fn rollback(&mut self) -> Result<(), StorageError>;
}
