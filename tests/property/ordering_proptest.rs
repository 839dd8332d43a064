//! Property-based tests for sibling ordering through the service

use kanflow::shared::patch::{NewCard, NewList};
use proptest::prelude::*;

use crate::common::Harness;

#[derive(Debug, Clone)]
enum Op {
    CreateList(Option<i32>),
    DeleteList(usize),
    ReorderList(usize, i32),
    CreateCard(usize, Option<i32>),
    DeleteCard(usize, usize),
    MoveCard(usize, usize, usize, i32),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        proptest::option::of(0..6i32).prop_map(Op::CreateList),
        (0..8usize).prop_map(Op::DeleteList),
        (0..8usize, 0..8i32).prop_map(|(i, p)| Op::ReorderList(i, p)),
        (0..8usize, proptest::option::of(0..8i32)).prop_map(|(i, p)| Op::CreateCard(i, p)),
        (0..8usize, 0..8usize).prop_map(|(i, j)| Op::DeleteCard(i, j)),
        (0..8usize, 0..8usize, 0..8usize, 0..10i32).prop_map(|(a, b, c, p)| Op::MoveCard(a, b, c, p)),
    ]
}

async fn run(ops: Vec<Op>) -> Result<(), TestCaseError> {
    let h = Harness::new().await;
    let board = h.board("Fuzz").await;
    let user = h.owner.id;

    for op in ops {
        let lists = h.service.board_lists(user, board.id).await.unwrap();
        match op {
            Op::CreateList(position) => {
                let input = NewList { title: "list".into(), position };
                h.service.create_list(user, board.id, input).await.unwrap();
            }
            Op::DeleteList(i) if !lists.is_empty() => {
                let list = &lists[i % lists.len()];
                h.service.delete_list(user, board.id, list.id).await.unwrap();
            }
            Op::ReorderList(i, position) if !lists.is_empty() => {
                let list = &lists[i % lists.len()];
                h.service.reorder_list(user, board.id, list.id, position).await.unwrap();
            }
            Op::CreateCard(i, position) if !lists.is_empty() => {
                let list = &lists[i % lists.len()];
                let input = NewCard { title: "card".into(), description: None, position };
                h.service.create_card(user, list.id, input).await.unwrap();
            }
            Op::DeleteCard(i, j) if !lists.is_empty() => {
                let list = &lists[i % lists.len()];
                let cards = h.service.list_cards(user, list.id).await.unwrap();
                if !cards.is_empty() {
                    h.service.delete_card(user, cards[j % cards.len()].id).await.unwrap();
                }
            }
            Op::MoveCard(from, j, to, position) if !lists.is_empty() => {
                let source = &lists[from % lists.len()];
                let target = &lists[to % lists.len()];
                let cards = h.service.list_cards(user, source.id).await.unwrap();
                if !cards.is_empty() {
                    let card = &cards[j % cards.len()];
                    h.service.move_card(user, card.id, target.id, position).await.unwrap();
                }
            }
            _ => {}
        }

        let details = h.service.board_details(user, board.id).await.unwrap();
        for (index, entry) in details.lists.iter().enumerate() {
            prop_assert_eq!(entry.list.position, index as i32);
            for (slot, card) in entry.cards.iter().enumerate() {
                prop_assert_eq!(card.position, slot as i32);
                prop_assert_eq!(card.list_id, entry.list.id);
            }
        }
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn test_positions_stay_dense(ops in proptest::collection::vec(op(), 1..40)) {
        let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
        runtime.block_on(run(ops))?;
    }
}
