/**
 * In-Memory Board Store
 *
 * A unit of work holds the store's lock for its whole lifetime. Reads go
 * straight to the locked state; the first write clones it into a private
 * copy that all later reads and writes use. `commit` swaps the copy in;
 * dropping the unit or calling `rollback` throws it away. A unit that only
 * reads never copies anything. Units are fully serialized, so two
 * relocations in the same sibling group can never interleave their range
 * reads and range writes.
 */

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use crate::backend::storage::{BoardStore, SiblingScope, StorageError, UnitOfWork};
use crate::shared::board::{Board, BoardList, BoardMembership, Card, InvitationStatus, User};

#[derive(Debug, Default, Clone)]
struct MemoryState {
    users: HashMap<Uuid, User>,
    boards: HashMap<Uuid, Board>,
    lists: HashMap<Uuid, BoardList>,
    cards: HashMap<Uuid, Card>,
    memberships: HashMap<(Uuid, Uuid), BoardMembership>,
}

/// Shared, cloneable in-process store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
    #[cfg(test)]
    fail_next_commit: Arc<std::sync::atomic::AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user. Sign-up lives outside this crate; this is how users
    /// get into the store.
    pub async fn insert_user(&self, user: User) -> Result<(), StorageError> {
        let mut state = self.state.lock().await;
        if state.users.contains_key(&user.id) {
            return Err(StorageError::Duplicate { kind: "user", id: user.id });
        }
        tracing::debug!("[Storage] Registered user {} <{}>", user.id, user.email);
        state.users.insert(user.id, user);
        Ok(())
    }

    /// Make the next commit fail after all writes were staged.
    #[cfg(test)]
    pub(crate) fn fail_next_commit(&self) {
        self.fail_next_commit
            .store(true, std::sync::atomic::Ordering::SeqCst);
    }
}

#[async_trait]
impl BoardStore for MemoryStore {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, StorageError> {
        Ok(Box::new(self.begin_unit().await))
    }
}

impl MemoryStore {
    async fn begin_unit(&self) -> MemoryUnit {
        MemoryUnit {
            guard: Some(self.state.clone().lock_owned().await),
            work: None,
            #[cfg(test)]
            fail_next_commit: self.fail_next_commit.clone(),
        }
    }
}

/// Unit of work over a [`MemoryStore`]
pub struct MemoryUnit {
    guard: Option<OwnedMutexGuard<MemoryState>>,
    /// Private copy, made on first write
    work: Option<MemoryState>,
    #[cfg(test)]
    fail_next_commit: Arc<std::sync::atomic::AtomicBool>,
}

impl MemoryUnit {
    fn read(&self) -> Result<&MemoryState, StorageError> {
        let guard = self.guard.as_ref().ok_or(StorageError::Finished)?;
        Ok(self.work.as_ref().unwrap_or(&**guard))
    }

    fn write(&mut self) -> Result<&mut MemoryState, StorageError> {
        let guard = self.guard.as_ref().ok_or(StorageError::Finished)?;
        Ok(self.work.get_or_insert_with(|| MemoryState::clone(guard)))
    }

    #[cfg(test)]
    fn has_private_copy(&self) -> bool {
        self.work.is_some()
    }

    #[cfg(test)]
    fn take_injected_failure(&self) -> bool {
        self.fail_next_commit
            .swap(false, std::sync::atomic::Ordering::SeqCst)
    }

    #[cfg(not(test))]
    fn take_injected_failure(&self) -> bool {
        false
    }
}

fn sorted_by_position<T, F>(mut rows: Vec<T>, position: F) -> Vec<T>
where
    F: Fn(&T) -> i32,
{
    rows.sort_by_key(|row| position(row));
    rows
}

#[async_trait]
impl UnitOfWork for MemoryUnit {
    async fn board(&mut self, id: Uuid) -> Result<Option<Board>, StorageError> {
        Ok(self.read()?.boards.get(&id).cloned())
    }

    async fn boards_for_user(&mut self, user_id: Uuid) -> Result<Vec<Board>, StorageError> {
        let state = self.read()?;
        let mut boards: Vec<Board> = state
            .boards
            .values()
            .filter(|board| {
                board.owner_id == user_id
                    || state
                        .memberships
                        .get(&(board.id, user_id))
                        .is_some_and(|m| m.status == InvitationStatus::Accepted)
            })
            .cloned()
            .collect();
        boards.sort_by(|a, b| a.title.cmp(&b.title).then(a.id.cmp(&b.id)));
        Ok(boards)
    }

    async fn insert_board(&mut self, board: &Board) -> Result<(), StorageError> {
        let state = self.write()?;
        if state.boards.contains_key(&board.id) {
            return Err(StorageError::Duplicate { kind: "board", id: board.id });
        }
        state.boards.insert(board.id, board.clone());
        Ok(())
    }

    async fn update_board(&mut self, board: &Board) -> Result<(), StorageError> {
        let state = self.write()?;
        match state.boards.get_mut(&board.id) {
            Some(row) => {
                *row = board.clone();
                Ok(())
            }
            None => Err(StorageError::Missing { kind: "board", id: board.id }),
        }
    }

    async fn delete_board(&mut self, id: Uuid) -> Result<bool, StorageError> {
        let state = self.write()?;
        if state.boards.remove(&id).is_none() {
            return Ok(false);
        }
        let list_ids: Vec<Uuid> = state
            .lists
            .values()
            .filter(|list| list.board_id == id)
            .map(|list| list.id)
            .collect();
        for list_id in &list_ids {
            state.lists.remove(list_id);
        }
        state.cards.retain(|_, card| !list_ids.contains(&card.list_id));
        state.memberships.retain(|(board_id, _), _| *board_id != id);
        Ok(true)
    }

    async fn list(&mut self, id: Uuid) -> Result<Option<BoardList>, StorageError> {
        Ok(self.read()?.lists.get(&id).cloned())
    }

    async fn lists_ordered(&mut self, board_id: Uuid) -> Result<Vec<BoardList>, StorageError> {
        let rows: Vec<BoardList> = self
            .read()?
            .lists
            .values()
            .filter(|list| list.board_id == board_id)
            .cloned()
            .collect();
        Ok(sorted_by_position(rows, |list: &BoardList| list.position))
    }

    async fn insert_list(&mut self, list: &BoardList) -> Result<(), StorageError> {
        let state = self.write()?;
        if !state.boards.contains_key(&list.board_id) {
            return Err(StorageError::Missing { kind: "board", id: list.board_id });
        }
        if state.lists.contains_key(&list.id) {
            return Err(StorageError::Duplicate { kind: "list", id: list.id });
        }
        state.lists.insert(list.id, list.clone());
        Ok(())
    }

    async fn update_list(&mut self, list: &BoardList) -> Result<(), StorageError> {
        let state = self.write()?;
        match state.lists.get_mut(&list.id) {
            Some(row) => {
                *row = list.clone();
                Ok(())
            }
            None => Err(StorageError::Missing { kind: "list", id: list.id }),
        }
    }

    async fn delete_list(&mut self, id: Uuid) -> Result<bool, StorageError> {
        let state = self.write()?;
        if state.lists.remove(&id).is_none() {
            return Ok(false);
        }
        state.cards.retain(|_, card| card.list_id != id);
        Ok(true)
    }

    async fn card(&mut self, id: Uuid) -> Result<Option<Card>, StorageError> {
        Ok(self.read()?.cards.get(&id).cloned())
    }

    async fn cards_ordered(&mut self, list_id: Uuid) -> Result<Vec<Card>, StorageError> {
        let rows: Vec<Card> = self
            .read()?
            .cards
            .values()
            .filter(|card| card.list_id == list_id)
            .cloned()
            .collect();
        Ok(sorted_by_position(rows, |card: &Card| card.position))
    }

    async fn insert_card(&mut self, card: &Card) -> Result<(), StorageError> {
        let state = self.write()?;
        if !state.lists.contains_key(&card.list_id) {
            return Err(StorageError::Missing { kind: "list", id: card.list_id });
        }
        if state.cards.contains_key(&card.id) {
            return Err(StorageError::Duplicate { kind: "card", id: card.id });
        }
        state.cards.insert(card.id, card.clone());
        Ok(())
    }

    async fn update_card(&mut self, card: &Card) -> Result<(), StorageError> {
        let state = self.write()?;
        if !state.lists.contains_key(&card.list_id) {
            return Err(StorageError::Missing { kind: "list", id: card.list_id });
        }
        match state.cards.get_mut(&card.id) {
            Some(row) => {
                *row = card.clone();
                Ok(())
            }
            None => Err(StorageError::Missing { kind: "card", id: card.id }),
        }
    }

    async fn delete_card(&mut self, id: Uuid) -> Result<bool, StorageError> {
        Ok(self.write()?.cards.remove(&id).is_some())
    }

    async fn shift_range(
        &mut self,
        scope: SiblingScope,
        from: i32,
        to: Option<i32>,
        delta: i32,
    ) -> Result<usize, StorageError> {
        let in_range = |position: i32| position >= from && to.map_or(true, |to| position <= to);
        let state = self.write()?;
        let mut touched = 0;
        match scope {
            SiblingScope::Lists(board_id) => {
                for list in state.lists.values_mut() {
                    if list.board_id == board_id && in_range(list.position) {
                        list.position += delta;
                        touched += 1;
                    }
                }
            }
            SiblingScope::Cards(list_id) => {
                for card in state.cards.values_mut() {
                    if card.list_id == list_id && in_range(card.position) {
                        card.position += delta;
                        touched += 1;
                    }
                }
            }
        }
        Ok(touched)
    }

    async fn user(&mut self, id: Uuid) -> Result<Option<User>, StorageError> {
        Ok(self.read()?.users.get(&id).cloned())
    }

    async fn user_by_email(&mut self, email: &str) -> Result<Option<User>, StorageError> {
        let email = email.trim();
        Ok(self
            .read()?
            .users
            .values()
            .find(|user| user.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn membership(
        &mut self,
        board_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<BoardMembership>, StorageError> {
        Ok(self.read()?.memberships.get(&(board_id, user_id)).cloned())
    }

    async fn upsert_membership(&mut self, membership: &BoardMembership) -> Result<(), StorageError> {
        let state = self.write()?;
        if !state.boards.contains_key(&membership.board_id) {
            return Err(StorageError::Missing { kind: "board", id: membership.board_id });
        }
        state
            .memberships
            .insert((membership.board_id, membership.user_id), membership.clone());
        Ok(())
    }

    async fn memberships_by_status(
        &mut self,
        board_id: Uuid,
        status: InvitationStatus,
    ) -> Result<Vec<BoardMembership>, StorageError> {
        let mut rows: Vec<BoardMembership> = self
            .read()?
            .memberships
            .values()
            .filter(|m| m.board_id == board_id && m.status == status)
            .cloned()
            .collect();
        rows.sort_by_key(|m| m.user_id);
        Ok(rows)
    }

    async fn pending_invitations(&mut self, user_id: Uuid) -> Result<Vec<BoardMembership>, StorageError> {
        let mut rows: Vec<BoardMembership> = self
            .read()?
            .memberships
            .values()
            .filter(|m| m.user_id == user_id && m.status == InvitationStatus::Pending)
            .cloned()
            .collect();
        rows.sort_by_key(|m| m.board_id);
        Ok(rows)
    }

    async fn commit(&mut self) -> Result<(), StorageError> {
        let mut guard = self.guard.take().ok_or(StorageError::Finished)?;
        if self.take_injected_failure() {
            return Err(StorageError::Backend("commit rejected".to_string()));
        }
        if let Some(work) = self.work.take() {
            *guard = work;
        }
        Ok(())
    }

    async fn rollback(&mut self) -> Result<(), StorageError> {
        self.guard.take();
        self.work = None;
        Ok(())
    }
}
