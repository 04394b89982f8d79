mod support;

use std::sync::Arc;

use axum::{body::to_bytes, http::Request, Router};
use support::{StubApi, StubConnector, StubEnricher};
use tower::ServiceExt;
use vamscout::{config::Config, state::AppState, store::MemoryStore};

fn app() -> Router {
    let state = AppState::with_parts(
        Config::default(),
        Arc::new(StubConnector::new(Arc::new(StubApi::new()))),
        Arc::new(StubEnricher::default()),
        Arc::new(MemoryStore::new()),
    );
    vamscout::app(state)
}

#[tokio::test]
async fn health_returns_ok() {
    let response = app()
        .oneshot(
            Request::builder()
                .uri("/health")
                .method("GET")
                .body(axum::body::Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), axum::http::StatusCode::OK);
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    let text = String::from_utf8(body.to_vec()).expect("utf8");
    assert!(text.contains("\"status\":\"ok\""));
    assert!(text.contains("\"service\":\"vamscout\""));
    assert!(text.contains("\"active_syncs\":0"));
}
