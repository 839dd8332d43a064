//! Ordering assertions

use kanflow::backend::service::BoardService;
use uuid::Uuid;

/// Assert the board's lists hold positions `0..n` and return their ids in order.
pub async fn assert_dense_lists(service: &BoardService, user_id: Uuid, board_id: Uuid) -> Vec<Uuid> {
    let lists = service.board_lists(user_id, board_id).await.expect("board lists");
    let positions: Vec<i32> = lists.iter().map(|l| l.position).collect();
    let expected: Vec<i32> = (0..lists.len() as i32).collect();
    assert_eq!(positions, expected, "list positions are not dense");
    lists.iter().map(|l| l.id).collect()
}

/// Assert the list's cards hold positions `0..n` and return their ids in order.
pub async fn assert_dense_cards(service: &BoardService, user_id: Uuid, list_id: Uuid) -> Vec<Uuid> {
    let cards = service.list_cards(user_id, list_id).await.expect("list cards");
    let positions: Vec<i32> = cards.iter().map(|c| c.position).collect();
    let expected: Vec<i32> = (0..cards.len() as i32).collect();
    assert_eq!(positions, expected, "card positions are not dense");
    cards.iter().map(|c| c.id).collect()
}
