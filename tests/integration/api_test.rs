//! Board REST API

use std::time::Duration;

use axum::http::StatusCode;
use axum_test::TestRequest;
use kanflow::shared::{Board, BoardDetails, BoardList, BoardMembership, Card, MemberSummary};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::common::server::{eventually, identity, TestApp};

fn as_user(request: TestRequest, user_id: Uuid) -> TestRequest {
    let (name, value) = identity(user_id);
    request.add_header(name, value)
}

#[tokio::test]
async fn test_board_lifecycle() {
    let app = TestApp::new().await;
    let owner = app.harness.owner.id;

    let response = as_user(app.server.post("/api/boards"), owner)
        .json(&json!({ "title": "Roadmap" }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let board: Board = response.json();
    assert_eq!(board.owner_id, owner);

    let boards: Vec<Board> = as_user(app.server.get("/api/boards"), owner).await.json();
    assert_eq!(boards, vec![board.clone()]);

    let renamed: Board = as_user(app.server.patch(&format!("/api/boards/{}", board.id)), owner)
        .json(&json!({ "title": "Q3" }))
        .await
        .json();
    assert_eq!(renamed.title, "Q3");

    as_user(app.server.delete(&format!("/api/boards/{}", board.id)), owner)
        .await
        .assert_status(StatusCode::NO_CONTENT);
    as_user(app.server.get(&format!("/api/boards/{}", board.id)), owner)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_requests_without_identity_are_unauthorized() {
    let app = TestApp::new().await;
    app.server
        .get("/api/boards")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
    app.server
        .post("/api/boards")
        .json(&json!({ "title": "Roadmap" }))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_error_body_and_status() {
    let app = TestApp::new().await;
    let owner = app.harness.owner.id;
    let board = app.harness.board("Roadmap").await;

    let response = as_user(app.server.post(&format!("/api/boards/{}/lists", board.id)), owner)
        .json(&json!({ "title": "   " }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["status"], json!(400));

    as_user(app.server.get(&format!("/api/boards/{}", board.id)), Uuid::new_v4())
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_reorder_and_move_over_http() {
    let app = TestApp::new().await;
    let owner = app.harness.owner.id;
    let board = app.harness.board("Roadmap").await;
    let lists = app.harness.lists(board.id, &["Todo", "Doing", "Done"]).await;

    let moved: BoardList = as_user(
        app.server
            .patch(&format!("/api/boards/{}/lists/{}/reorder", board.id, lists[0].id)),
        owner,
    )
    .json(&json!({ "new_position": 2 }))
    .await
    .json();
    assert_eq!(moved.position, 2);

    let order: Vec<String> = as_user(app.server.get(&format!("/api/boards/{}/lists", board.id)), owner)
        .await
        .json::<Vec<BoardList>>()
        .into_iter()
        .map(|list| list.title)
        .collect();
    assert_eq!(order, vec!["Doing", "Done", "Todo"]);

    let response = as_user(app.server.post(&format!("/api/lists/{}/cards", lists[1].id)), owner)
        .json(&json!({ "title": "Ship it", "description": "soon" }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let card: Card = response.json();

    let moved: Card = as_user(app.server.patch(&format!("/api/cards/{}/move", card.id)), owner)
        .json(&json!({ "new_list_id": lists[2].id, "new_position": 0 }))
        .await
        .json();
    assert_eq!(moved.list_id, lists[2].id);
    assert_eq!(moved.position, 0);

    let cleared: Card = as_user(app.server.patch(&format!("/api/cards/{}", card.id)), owner)
        .json(&json!({ "description": null }))
        .await
        .json();
    assert_eq!(cleared.description, None);
    assert_eq!(cleared.title, "Ship it");

    as_user(app.server.delete(&format!("/api/cards/{}", card.id)), owner)
        .await
        .assert_status(StatusCode::NO_CONTENT);
    let details: BoardDetails = as_user(app.server.get(&format!("/api/boards/{}", board.id)), owner)
        .await
        .json();
    assert!(details.lists.iter().all(|list| list.cards.is_empty()));
}

#[tokio::test]
async fn test_invitation_flow_over_http() {
    let app = TestApp::new().await;
    let owner = app.harness.owner.id;
    let board = app.harness.board("Roadmap").await;
    let guest = app.harness.user("guest").await;

    let response = as_user(app.server.post(&format!("/api/boards/{}/invite", board.id)), owner)
        .json(&json!({ "email": guest.email }))
        .await;
    response.assert_status(StatusCode::CREATED);

    let pending: Vec<BoardMembership> = as_user(app.server.get("/api/invitations/pending"), guest.id)
        .await
        .json();
    assert_eq!(pending.len(), 1);

    as_user(
        app.server.post(&format!("/api/boards/{}/invite/respond", board.id)),
        guest.id,
    )
    .json(&json!({ "status": "pending" }))
    .await
    .assert_status(StatusCode::BAD_REQUEST);

    as_user(
        app.server.post(&format!("/api/boards/{}/invite/respond", board.id)),
        guest.id,
    )
    .json(&json!({ "status": "accepted" }))
    .await
    .assert_status_ok();

    let members: Vec<MemberSummary> = as_user(app.server.get(&format!("/api/boards/{}/members", board.id)), guest.id)
        .await
        .json();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].user_id, guest.id);

    as_user(app.server.patch(&format!("/api/boards/{}", board.id)), guest.id)
        .json(&json!({ "title": "Mine now" }))
        .await
        .assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_http_mutation_reaches_board_socket() {
    let app = TestApp::new().await;
    let owner = app.harness.owner.id;
    let board = app.harness.board("Roadmap").await;

    let mut socket = as_user(app.server.get_websocket(&format!("/ws/board/{}", board.id)), owner)
        .await
        .into_websocket()
        .await;
    let registry = app.harness.service.registry().clone();
    assert!(eventually(|| registry.group_size(board.id) == 1).await);

    as_user(app.server.post(&format!("/api/boards/{}/lists", board.id)), owner)
        .json(&json!({ "title": "Todo" }))
        .await
        .assert_status(StatusCode::CREATED);

    let event = tokio::time::timeout(Duration::from_secs(2), socket.receive_json::<Value>())
        .await
        .expect("event before timeout");
    assert_eq!(event["type"], json!("LIST_CREATED"));
    assert_eq!(event["payload"]["title"], json!("Todo"));
}
