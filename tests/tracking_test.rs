mod common;

use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;

use common::{json_request, response_json, test_pool, test_router};

#[tokio::test]
async fn test_repeat_visits_increment_the_counter() {
    let pool = test_pool().await;
    let dir = tempfile::tempdir().unwrap();
    let router = test_router(pool.clone(), dir.path());

    let payload = json!({ "advertisingId": "gclid-123", "clientId": "GA1.1.1" });
    for _ in 0..2 {
        let response = router
            .clone()
            .oneshot(json_request("POST", "/tracking/google-id", payload.clone()))
            .await
            .unwrap();
        let (status, body) = response_json(response).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], json!(true));
    }

    let (visits, client_id): (i64, Option<String>) = sqlx::query_as(
        "SELECT visit_count, client_id FROM google_tracking WHERE advertising_id = 'gclid-123'",
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(visits, 2);
    assert_eq!(client_id.as_deref(), Some("GA1.1.1"));
}

#[tokio::test]
async fn test_known_ids_are_kept_when_request_omits_them() {
    let pool = test_pool().await;
    let dir = tempfile::tempdir().unwrap();
    let router = test_router(pool.clone(), dir.path());

    let first = json!({ "advertisingId": "gclid-9", "sessionId": "sess-1" });
    let second = json!({ "advertisingId": "gclid-9" });
    for payload in [first, second] {
        let response = router
            .clone()
            .oneshot(json_request("POST", "/tracking/google-id", payload))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let session_id: Option<String> = sqlx::query_scalar(
        "SELECT session_id FROM google_tracking WHERE advertising_id = 'gclid-9'",
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(session_id.as_deref(), Some("sess-1"));
}

#[tokio::test]
async fn test_missing_advertising_id_is_rejected() {
    let pool = test_pool().await;
    let dir = tempfile::tempdir().unwrap();
    let router = test_router(pool, dir.path());

    let response = router
        .oneshot(json_request("POST", "/tracking/google-id", json!({ "clientId": "GA1.1.1" })))
        .await
        .unwrap();
    let (status, body) = response_json(response).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("Missing advertisingId"));
}

#[tokio::test]
async fn test_storage_failure_does_not_break_the_response() {
    let pool = test_pool().await;
    let dir = tempfile::tempdir().unwrap();
    let router = test_router(pool.clone(), dir.path());
    pool.close().await;

    let response = router
        .oneshot(json_request("POST", "/tracking/google-id", json!({ "advertisingId": "g-1" })))
        .await
        .unwrap();
    let (status, body) = response_json(response).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
}
