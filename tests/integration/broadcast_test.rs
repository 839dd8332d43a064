//! Event delivery through the registry

use std::sync::Arc;

use kanflow::backend::realtime::ConnectionHandle;
use kanflow::shared::event::{BoardEvent, EventType};
use kanflow::shared::patch::CardPatch;
use serde_json::json;
use uuid::Uuid;

use crate::common::{drain, Harness};

#[tokio::test]
async fn test_events_arrive_in_commit_order() {
    let h = Harness::new().await;
    let board = h.board("Roadmap").await;
    let mut rx = h.watch_board(board.id, h.owner.id);

    let lists = h.lists(board.id, &["Todo"]).await;
    let cards = h.cards(lists[0].id, &["a"]).await;
    let patch = CardPatch { title: None, description: Some(Some("details".into())) };
    h.service.update_card(h.owner.id, cards[0].id, patch).await.unwrap();
    h.service.delete_card(h.owner.id, cards[0].id).await.unwrap();

    let types: Vec<EventType> = drain(&mut rx).iter().map(|e| e.event_type).collect();
    assert_eq!(
        types,
        vec![
            EventType::ListCreated,
            EventType::CardCreated,
            EventType::CardUpdated,
            EventType::CardDeleted,
        ]
    );
}

#[tokio::test]
async fn test_late_joiner_sees_only_later_events() {
    let h = Harness::new().await;
    let board = h.board("Roadmap").await;
    let mut early = h.watch_board(board.id, h.owner.id);
    h.lists(board.id, &["Todo"]).await;

    let mut late = h.watch_board(board.id, h.owner.id);
    h.lists(board.id, &["Done"]).await;

    assert_eq!(drain(&mut early).len(), 2);
    let seen = drain(&mut late);
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].payload["title"], "Done");
}

#[tokio::test]
async fn test_other_boards_are_isolated() {
    let h = Harness::new().await;
    let first = h.board("First").await;
    let second = h.board("Second").await;
    let mut rx = h.watch_board(second.id, h.owner.id);

    h.lists(first.id, &["Todo"]).await;
    assert!(drain(&mut rx).is_empty());
}

#[tokio::test]
async fn test_closed_connection_is_pruned() {
    let h = Harness::new().await;
    let board = h.board("Roadmap").await;
    let mut live = h.watch_board(board.id, h.owner.id);
    let gone = h.watch_board(board.id, h.owner.id);
    drop(gone);
    assert_eq!(h.service.registry().group_size(board.id), 2);

    h.lists(board.id, &["Todo"]).await;
    assert_eq!(h.service.registry().group_size(board.id), 1);
    assert_eq!(drain(&mut live).len(), 1);
}

#[tokio::test]
async fn test_notify_reaches_every_connection_of_user() {
    let h = Harness::new().await;
    let user_id = Uuid::new_v4();
    let (phone, mut phone_rx) = ConnectionHandle::channel(user_id, 4);
    let (laptop, mut laptop_rx) = ConnectionHandle::channel(user_id, 4);
    h.service.connect_user(phone);
    h.service.connect_user(laptop);

    let event = BoardEvent::new(EventType::InvitationReceived, json!({ "board_title": "Roadmap" }));
    let delivered = h.service.registry().notify(user_id, event).await;
    assert_eq!(delivered, 2);

    let a: Arc<BoardEvent> = phone_rx.recv().await.unwrap();
    let b: Arc<BoardEvent> = laptop_rx.recv().await.unwrap();
    assert_eq!(a.payload, b.payload);
}
