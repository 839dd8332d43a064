//! Common test utilities and helpers
//!
//! - Service fixtures over a fresh in-memory store
//! - Live connection helpers for observing emitted events
//! - Ordering assertions
//! - An in-process HTTP server (ssr only)

pub mod assertions;
#[cfg(feature = "ssr")]
pub mod server;

use std::sync::Arc;
use std::time::Duration;

use kanflow::backend::realtime::{BroadcastRegistry, ConnectionHandle};
use kanflow::backend::service::BoardService;
use kanflow::backend::storage::MemoryStore;
use kanflow::shared::event::BoardEvent;
use kanflow::shared::patch::{NewBoard, NewCard, NewList};
use kanflow::shared::{Board, BoardList, Card, User};
use tokio::sync::mpsc;
use uuid::Uuid;

pub use assertions::*;

/// A service over an empty store with one registered owner.
pub struct Harness {
    pub store: MemoryStore,
    pub service: BoardService,
    pub owner: User,
}

impl Harness {
    pub async fn new() -> Self {
        let store = MemoryStore::new();
        let registry = Arc::new(BroadcastRegistry::new(Duration::from_millis(100)));
        let service = BoardService::new(Arc::new(store.clone()), registry);
        let owner = User::new("owner@example.com", "owner");
        store.insert_user(owner.clone()).await.expect("insert owner");
        Self { store, service, owner }
    }

    pub async fn user(&self, name: &str) -> User {
        let user = User::new(format!("{name}@example.com"), name);
        self.store.insert_user(user.clone()).await.expect("insert user");
        user
    }

    pub async fn board(&self, title: &str) -> Board {
        self.service
            .create_board(self.owner.id, NewBoard { title: title.into() })
            .await
            .expect("create board")
    }

    pub async fn lists(&self, board_id: Uuid, titles: &[&str]) -> Vec<BoardList> {
        let mut lists = Vec::new();
        for title in titles {
            let input = NewList { title: (*title).into(), position: None };
            lists.push(self.service.create_list(self.owner.id, board_id, input).await.expect("create list"));
        }
        lists
    }

    pub async fn cards(&self, list_id: Uuid, titles: &[&str]) -> Vec<Card> {
        let mut cards = Vec::new();
        for title in titles {
            let input = NewCard { title: (*title).into(), description: None, position: None };
            cards.push(self.service.create_card(self.owner.id, list_id, input).await.expect("create card"));
        }
        cards
    }

    /// Join a fresh connection for `user_id` to the board's group.
    pub fn watch_board(&self, board_id: Uuid, user_id: Uuid) -> mpsc::Receiver<Arc<BoardEvent>> {
        let (conn, rx) = ConnectionHandle::channel(user_id, 32);
        self.service.registry().join(board_id, conn);
        rx
    }

    /// Join a fresh connection to `user_id`'s personal notifications.
    pub fn watch_user(&self, user_id: Uuid) -> mpsc::Receiver<Arc<BoardEvent>> {
        let (conn, rx) = ConnectionHandle::channel(user_id, 32);
        self.service.connect_user(conn);
        rx
    }
}

/// Everything already delivered to `rx`.
pub fn drain(rx: &mut mpsc::Receiver<Arc<BoardEvent>>) -> Vec<Arc<BoardEvent>> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}
