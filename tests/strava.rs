use std::time::Duration;

use axum::{
    extract::Path,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use reqwest::StatusCode as UpstreamStatus;
use serde_json::json;
use vamscout::{
    config::Config,
    error::StravaError,
    strava::{classify_failure, HttpConnector, StravaApi, StravaConnector},
};

#[test]
fn unauthorized_status_is_fatal() {
    let err = classify_failure(UpstreamStatus::UNAUTHORIZED, "{}".to_string());
    assert!(matches!(err, StravaError::Unauthorized(_)));
    assert!(err.is_fatal());
}

#[test]
fn invalid_access_token_body_is_fatal_whatever_the_status() {
    let body = r#"{"message":"Bad Request","errors":[{"resource":"Athlete","field":"access_token","code":"invalid"}]}"#;
    let err = classify_failure(UpstreamStatus::BAD_REQUEST, body.to_string());
    assert!(matches!(err, StravaError::Unauthorized(_)));
    assert!(err.is_fatal());

    let err = classify_failure(
        UpstreamStatus::FORBIDDEN,
        r#"{"message":"Authorization Error"}"#.to_string(),
    );
    assert!(matches!(err, StravaError::Unauthorized(_)));
}

#[test]
fn rate_limit_and_server_errors_are_isolated() {
    let err = classify_failure(UpstreamStatus::TOO_MANY_REQUESTS, "Rate Limit Exceeded".to_string());
    assert!(matches!(err, StravaError::RateLimited));
    assert!(!err.is_fatal());

    let err = classify_failure(UpstreamStatus::INTERNAL_SERVER_ERROR, "oops".to_string());
    assert!(matches!(err, StravaError::Status { status: 500, .. }));
    assert!(!err.is_fatal());

    let err = classify_failure(
        UpstreamStatus::BAD_REQUEST,
        r#"{"errors":[{"field":"bounds","code":"invalid"}]}"#.to_string(),
    );
    assert!(matches!(err, StravaError::Status { status: 400, .. }));
}

async fn activity_response(Path(id): Path<u64>) -> axum::response::Response {
    match id {
        1 => (StatusCode::UNAUTHORIZED, "{}").into_response(),
        2 => (
            StatusCode::BAD_REQUEST,
            r#"{"errors":[{"field":"access_token","code":"invalid"}]}"#,
        )
            .into_response(),
        3 => (StatusCode::FORBIDDEN, r#"{"message":"Authorization Error"}"#).into_response(),
        4 => (StatusCode::TOO_MANY_REQUESTS, "Rate Limit Exceeded").into_response(),
        5 => {
            tokio::time::sleep(Duration::from_secs(2)).await;
            Json(json!({ "id": 5 })).into_response()
        }
        6 => (StatusCode::OK, "not json").into_response(),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response(),
    }
}

async fn upstream() -> String {
    let app = Router::new()
        .route("/athlete", get(|| async { Json(json!({ "id": 42, "username": "climber" })) }))
        .route(
            "/segments/explore",
            get(|| async {
                Json(json!({
                    "segments": [
                        { "id": 9, "name": "Col", "distance": 1200.0, "avg_grade": 7.5,
                          "elev_difference": 90.0, "climb_category": 3 }
                    ]
                }))
            }),
        )
        .route("/activities/:id", get(activity_response));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    format!("http://{}", addr)
}

fn connector(base_url: String) -> HttpConnector {
    let config = Config {
        strava_api_url: base_url,
        request_timeout: Duration::from_millis(300),
        ..Config::default()
    };
    HttpConnector::new(&config).expect("connector")
}

#[tokio::test]
async fn client_decodes_successful_payloads() {
    let api = connector(upstream().await).connect("token");

    let athlete = api.current_athlete().await.expect("athlete");
    assert_eq!(athlete.id, 42);
    assert_eq!(athlete.user_key(), "42");

    let bbox = vamscout::types::bounds::BoundingBox::new(45.0, 6.0, 46.0, 7.0).expect("bbox");
    let segments = api.explore_segments(&bbox).await.expect("segments");
    assert_eq!(segments.len(), 1);
    assert_eq!(segments[0].climb_category, 3);
}

#[tokio::test]
async fn client_classifies_upstream_failures() {
    let api = connector(upstream().await).connect("token");

    for id in [1, 2, 3] {
        let err = api.get_activity(id).await.expect_err("auth failure");
        assert!(err.is_fatal(), "activity {} gave {:?}", id, err);
    }

    let err = api.get_activity(4).await.expect_err("rate limited");
    assert!(matches!(err, StravaError::RateLimited));

    let err = api.get_activity(5).await.expect_err("timeout");
    assert!(matches!(err, StravaError::Timeout));
    assert!(!err.is_fatal());

    let err = api.get_activity(6).await.expect_err("decode");
    assert!(matches!(err, StravaError::Decode(_)));

    let err = api.get_activity(7).await.expect_err("server error");
    assert!(matches!(err, StravaError::Status { status: 500, .. }));
    assert!(!err.is_fatal());
}
