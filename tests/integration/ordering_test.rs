//! Ordering behaviour through the service

use kanflow::shared::event::EventType;
use kanflow::shared::patch::{NewCard, NewList};
use pretty_assertions::assert_eq;

use crate::common::{assert_dense_cards, assert_dense_lists, drain, Harness};

#[tokio::test]
async fn test_reorder_last_list_to_front() {
    let h = Harness::new().await;
    let board = h.board("Roadmap").await;
    let lists = h.lists(board.id, &["A", "B", "C"]).await;
    let mut rx = h.watch_board(board.id, h.owner.id);

    let moved = h.service.reorder_list(h.owner.id, board.id, lists[2].id, 0).await.unwrap();
    assert_eq!(moved.position, 0);

    let order = assert_dense_lists(&h.service, h.owner.id, board.id).await;
    assert_eq!(order, vec![lists[2].id, lists[0].id, lists[1].id]);

    let events = drain(&mut rx);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event_type, EventType::ListReordered);
    assert_eq!(events[0].payload["position"], 0);
}

#[tokio::test]
async fn test_move_card_between_lists() {
    let h = Harness::new().await;
    let board = h.board("Roadmap").await;
    let lists = h.lists(board.id, &["Todo", "Done"]).await;
    let todo = h.cards(lists[0].id, &["a", "b", "c"]).await;
    let done = h.cards(lists[1].id, &["x", "y"]).await;
    let mut rx = h.watch_board(board.id, h.owner.id);

    let moved = h.service.move_card(h.owner.id, todo[1].id, lists[1].id, 1).await.unwrap();
    assert_eq!(moved.list_id, lists[1].id);
    assert_eq!(moved.position, 1);

    let source = assert_dense_cards(&h.service, h.owner.id, lists[0].id).await;
    assert_eq!(source, vec![todo[0].id, todo[2].id]);
    let target = assert_dense_cards(&h.service, h.owner.id, lists[1].id).await;
    assert_eq!(target, vec![done[0].id, todo[1].id, done[1].id]);

    let events = drain(&mut rx);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event_type, EventType::CardMoved);
    assert_eq!(events[0].payload["list_id"], serde_json::json!(lists[1].id));
}

#[tokio::test]
async fn test_move_card_past_end_appends() {
    let h = Harness::new().await;
    let board = h.board("Roadmap").await;
    let lists = h.lists(board.id, &["Todo", "Done"]).await;
    let todo = h.cards(lists[0].id, &["a"]).await;
    let done = h.cards(lists[1].id, &["x", "y"]).await;

    let moved = h.service.move_card(h.owner.id, todo[0].id, lists[1].id, 99).await.unwrap();
    assert_eq!(moved.position, 2);
    assert!(assert_dense_cards(&h.service, h.owner.id, lists[0].id).await.is_empty());
    let target = assert_dense_cards(&h.service, h.owner.id, lists[1].id).await;
    assert_eq!(target, vec![done[0].id, done[1].id, todo[0].id]);
}

#[tokio::test]
async fn test_insert_in_middle_shifts_followers() {
    let h = Harness::new().await;
    let board = h.board("Roadmap").await;
    let lists = h.lists(board.id, &["A", "B"]).await;

    let input = NewList { title: "Between".into(), position: Some(1) };
    let between = h.service.create_list(h.owner.id, board.id, input).await.unwrap();
    let order = assert_dense_lists(&h.service, h.owner.id, board.id).await;
    assert_eq!(order, vec![lists[0].id, between.id, lists[1].id]);

    let cards = h.cards(lists[0].id, &["a", "b"]).await;
    let input = NewCard { title: "first".into(), description: None, position: Some(0) };
    let first = h.service.create_card(h.owner.id, lists[0].id, input).await.unwrap();
    let order = assert_dense_cards(&h.service, h.owner.id, lists[0].id).await;
    assert_eq!(order, vec![first.id, cards[0].id, cards[1].id]);
}

#[tokio::test]
async fn test_delete_list_repacks_board() {
    let h = Harness::new().await;
    let board = h.board("Roadmap").await;
    let lists = h.lists(board.id, &["A", "B", "C", "D"]).await;
    h.cards(lists[1].id, &["gone"]).await;

    h.service.delete_list(h.owner.id, board.id, lists[1].id).await.unwrap();
    let order = assert_dense_lists(&h.service, h.owner.id, board.id).await;
    assert_eq!(order, vec![lists[0].id, lists[2].id, lists[3].id]);

    let details = h.service.board_details(h.owner.id, board.id).await.unwrap();
    assert_eq!(details.lists.len(), 3);
    assert!(details.lists.iter().all(|l| l.cards.is_empty()));
}

#[tokio::test]
async fn test_board_details_are_ordered() {
    let h = Harness::new().await;
    let board = h.board("Roadmap").await;
    let lists = h.lists(board.id, &["A", "B"]).await;
    let cards = h.cards(lists[0].id, &["a", "b", "c"]).await;
    h.service.reorder_list(h.owner.id, board.id, lists[1].id, 0).await.unwrap();
    h.service.move_card(h.owner.id, cards[2].id, lists[0].id, 0).await.unwrap();

    let details = h.service.board_details(h.owner.id, board.id).await.unwrap();
    let list_ids: Vec<_> = details.lists.iter().map(|l| l.list.id).collect();
    assert_eq!(list_ids, vec![lists[1].id, lists[0].id]);
    let card_ids: Vec<_> = details.lists[1].cards.iter().map(|c| c.id).collect();
    assert_eq!(card_ids, vec![cards[2].id, cards[0].id, cards[1].id]);
}
