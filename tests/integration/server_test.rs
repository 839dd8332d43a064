//! Live event sockets and health over HTTP

use std::time::Duration;

use axum::http::StatusCode;
use kanflow::shared::patch::NewList;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::common::server::{eventually, identity, TestApp};

#[tokio::test]
async fn test_health() {
    let app = TestApp::new().await;
    let response = app.server.get("/health").await;
    response.assert_status_ok();
    response.assert_text("ok");
}

#[tokio::test]
async fn test_socket_without_identity_is_unauthorized() {
    let app = TestApp::new().await;
    app.server
        .get_websocket("/ws/user")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_board_socket_hidden_from_strangers() {
    let app = TestApp::new().await;
    let board = app.harness.board("Roadmap").await;

    let (name, value) = identity(Uuid::new_v4());
    app.server
        .get_websocket(&format!("/ws/board/{}", board.id))
        .add_header(name, value)
        .await
        .assert_status(StatusCode::NOT_FOUND);
    assert_eq!(app.harness.service.registry().group_count(), 0);
}

#[tokio::test]
async fn test_board_socket_joins_and_leaves_group() {
    let app = TestApp::new().await;
    let board = app.harness.board("Roadmap").await;

    let (name, value) = identity(app.harness.owner.id);
    let socket = app
        .server
        .get_websocket(&format!("/ws/board/{}", board.id))
        .add_header(name, value)
        .await
        .into_websocket()
        .await;

    let registry = app.harness.service.registry().clone();
    assert!(eventually(|| registry.group_size(board.id) == 1).await);

    socket.close().await;
    assert!(eventually(|| registry.group_size(board.id) == 0).await);
}

#[tokio::test]
async fn test_board_socket_streams_committed_events() {
    let app = TestApp::new().await;
    let board = app.harness.board("Roadmap").await;

    let (name, value) = identity(app.harness.owner.id);
    let mut socket = app
        .server
        .get_websocket(&format!("/ws/board/{}", board.id))
        .add_header(name, value)
        .await
        .into_websocket()
        .await;
    let registry = app.harness.service.registry().clone();
    assert!(eventually(|| registry.group_size(board.id) == 1).await);

    app.harness
        .service
        .create_list(app.harness.owner.id, board.id, NewList { title: "Todo".into(), position: None })
        .await
        .unwrap();

    let event: Value = tokio::time::timeout(Duration::from_secs(2), socket.receive_json::<Value>())
        .await
        .expect("event before timeout");
    assert_eq!(event["type"], json!("LIST_CREATED"));
    assert_eq!(event["payload"]["title"], json!("Todo"));
    assert_eq!(event["payload"]["position"], json!(0));
}

#[tokio::test]
async fn test_user_socket_receives_invitation() {
    let app = TestApp::new().await;
    let board = app.harness.board("Roadmap").await;
    let guest = app.harness.user("guest").await;

    let (name, value) = identity(guest.id);
    let mut socket = app
        .server
        .get_websocket("/ws/user")
        .add_header(name, value)
        .await
        .into_websocket()
        .await;
    let registry = app.harness.service.registry().clone();
    assert!(eventually(|| registry.subject_size(guest.id) == 1).await);

    app.harness
        .service
        .invite_member(app.harness.owner.id, board.id, &guest.email)
        .await
        .unwrap();

    let event: Value = tokio::time::timeout(Duration::from_secs(2), socket.receive_json::<Value>())
        .await
        .expect("notification before timeout");
    assert_eq!(event["type"], json!("INVITATION_RECEIVED"));
    assert_eq!(event["payload"]["board_title"], json!("Roadmap"));
}
