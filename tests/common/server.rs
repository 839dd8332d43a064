//! In-process HTTP server over the test harness

use std::time::Duration;

use axum::http::{HeaderName, HeaderValue};
use axum_test::TestServer;
use kanflow::backend::routes::create_router;
use kanflow::backend::server::AppState;
use kanflow::shared::config::AppConfig;
use uuid::Uuid;

use super::Harness;

/// A router served over a real socket, sharing the harness's service.
pub struct TestApp {
    pub server: TestServer,
    pub harness: Harness,
}

impl TestApp {
    pub async fn new() -> Self {
        let harness = Harness::new().await;
        let config = AppConfig::builder()
            .bind_addr("127.0.0.1:0")
            .build()
            .expect("valid config");
        let app = create_router(AppState::new(harness.service.clone(), config));
        let server = TestServer::builder()
            .http_transport()
            .build(app)
            .expect("test server");
        Self { server, harness }
    }
}

/// Identity header naming `user_id` as the caller.
pub fn identity(user_id: Uuid) -> (HeaderName, HeaderValue) {
    (
        HeaderName::from_static("x-user-id"),
        HeaderValue::from_str(&user_id.to_string()).expect("uuid is a valid header value"),
    )
}

/// Poll `check` until it holds or two seconds pass.
pub async fn eventually(mut check: impl FnMut() -> bool) -> bool {
    for _ in 0..100 {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    false
}
