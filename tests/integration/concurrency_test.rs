//! Relocations racing on a multi-threaded runtime

use std::collections::HashSet;

use futures_util::future::join_all;
use pretty_assertions::assert_eq;

use crate::common::{assert_dense_cards, assert_dense_lists, Harness};

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_concurrent_list_reorders_stay_dense() {
    let h = Harness::new().await;
    let board = h.board("Roadmap").await;
    let lists = h.lists(board.id, &["A", "B", "C", "D", "E", "F"]).await;
    let board_id = board.id;

    let tasks = (0..48).map(|i| {
        let service = h.service.clone();
        let owner = h.owner.id;
        let list_id = lists[i % lists.len()].id;
        let target = ((i * 7) % lists.len()) as i32;
        tokio::spawn(async move { service.reorder_list(owner, board_id, list_id, target).await })
    });
    for result in join_all(tasks).await {
        result.expect("task").expect("reorder");
    }

    let order = assert_dense_lists(&h.service, h.owner.id, board.id).await;
    let expected: HashSet<_> = lists.iter().map(|l| l.id).collect();
    assert_eq!(order.into_iter().collect::<HashSet<_>>(), expected);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_concurrent_card_moves_stay_dense() {
    let h = Harness::new().await;
    let board = h.board("Roadmap").await;
    let lists = h.lists(board.id, &["Todo", "Doing", "Done"]).await;
    let mut cards = h.cards(lists[0].id, &["a", "b", "c", "d"]).await;
    cards.extend(h.cards(lists[1].id, &["e", "f", "g"]).await);

    let tasks = (0..60).map(|i| {
        let service = h.service.clone();
        let owner = h.owner.id;
        let card_id = cards[i % cards.len()].id;
        let target_list = lists[(i * 5) % lists.len()].id;
        let target = (i % 4) as i32;
        tokio::spawn(async move { service.move_card(owner, card_id, target_list, target).await })
    });
    for result in join_all(tasks).await {
        result.expect("task").expect("move");
    }

    let mut seen = HashSet::new();
    for list in &lists {
        seen.extend(assert_dense_cards(&h.service, h.owner.id, list.id).await);
    }
    assert_eq!(seen, cards.iter().map(|c| c.id).collect::<HashSet<_>>());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_mixed_relocations_in_one_list_stay_dense() {
    let h = Harness::new().await;
    let board = h.board("Roadmap").await;
    let lists = h.lists(board.id, &["Todo", "Done"]).await;
    let cards = h.cards(lists[0].id, &["a", "b", "c", "d", "e"]).await;
    let (board_id, todo) = (board.id, lists[0].id);

    let moves = (0..30).map(|i| {
        let service = h.service.clone();
        let owner = h.owner.id;
        let card_id = cards[i % cards.len()].id;
        let target = ((i * 3) % cards.len()) as i32;
        tokio::spawn(async move {
            service.move_card(owner, card_id, todo, target).await.map(|_| ())
        })
    });
    let reorders = (0..30).map(|i| {
        let service = h.service.clone();
        let owner = h.owner.id;
        let list_id = lists[i % 2].id;
        tokio::spawn(async move {
            service.reorder_list(owner, board_id, list_id, (i % 2) as i32).await.map(|_| ())
        })
    });
    for result in join_all(moves.chain(reorders)).await {
        result.expect("task").expect("relocation");
    }

    assert_dense_lists(&h.service, h.owner.id, board.id).await;
    let order = assert_dense_cards(&h.service, h.owner.id, lists[0].id).await;
    assert_eq!(order.len(), cards.len());
}
