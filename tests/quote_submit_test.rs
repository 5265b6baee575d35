mod common;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use common::{
    json_request, response_json, test_pool, test_router, test_router_with_failing_notifier,
};

fn valid_payload() -> serde_json::Value {
    json!({
        "companyName": "Atelier Test",
        "email": "contact@test.com",
        "phone": "+33 6 12 34 56 78",
        "description": "Portail coulissant en acier",
        "budget": "10k-25k",
        "selections": {
            "1": "inox",
            "2": "renovation",
            "3": "urgent",
            "4": "budget-medium"
        }
    })
}

#[tokio::test]
async fn test_valid_submission_persists_and_returns_id() {
    let pool = test_pool().await;
    let dir = tempfile::tempdir().unwrap();
    let router = test_router(pool.clone(), dir.path());

    let response = router
        .oneshot(json_request("POST", "/quote/submit", valid_payload()))
        .await
        .unwrap();
    let (status, body) = response_json(response).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["quoteId"], json!(1));

    let (service_type, timeline, status_col): (Option<String>, Option<String>, String) =
        sqlx::query_as(
            "SELECT service_type, timeline, status FROM quote_requests WHERE id = 1",
        )
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(service_type.as_deref(), Some("inox"));
    assert_eq!(timeline.as_deref(), Some("urgent"));
    assert_eq!(status_col, "pending");
}

#[tokio::test]
async fn test_missing_required_field_is_rejected_without_write() {
    let pool = test_pool().await;
    let dir = tempfile::tempdir().unwrap();
    let router = test_router(pool.clone(), dir.path());

    let mut payload = valid_payload();
    payload["email"] = json!("");
    let response = router
        .oneshot(json_request("POST", "/quote/submit", payload))
        .await
        .unwrap();
    let (status, body) = response_json(response).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("email"));

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM quote_requests")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn test_missing_selections_is_rejected() {
    let pool = test_pool().await;
    let dir = tempfile::tempdir().unwrap();
    let router = test_router(pool, dir.path());

    let mut payload = valid_payload();
    payload.as_object_mut().unwrap().remove("selections");
    let response = router
        .clone()
        .oneshot(json_request("POST", "/quote/submit", payload))
        .await
        .unwrap();
    let (status, _) = response_json(response).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let mut payload = valid_payload();
    payload["selections"] = json!({});
    let response = router
        .oneshot(json_request("POST", "/quote/submit", payload))
        .await
        .unwrap();
    let (status, _) = response_json(response).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_selection_keys_are_dropped_not_fatal() {
    let pool = test_pool().await;
    let dir = tempfile::tempdir().unwrap();
    let router = test_router(pool.clone(), dir.path());

    let mut payload = valid_payload();
    payload["selections"] = json!({ "abc": "x", "1": "construction" });
    let response = router
        .oneshot(json_request("POST", "/quote/submit", payload))
        .await
        .unwrap();
    let (status, _) = response_json(response).await;
    assert_eq!(status, StatusCode::OK);

    let (service_type, project_type): (Option<String>, Option<String>) = sqlx::query_as(
        "SELECT service_type, project_type FROM quote_requests WHERE id = 1",
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(service_type.as_deref(), Some("construction"));
    assert_eq!(project_type, None);
}

#[tokio::test]
async fn test_non_object_selections_is_a_400_json_error() {
    let pool = test_pool().await;
    let dir = tempfile::tempdir().unwrap();
    let router = test_router(pool.clone(), dir.path());

    let mut payload = valid_payload();
    payload["selections"] = json!("abc");
    let response = router
        .oneshot(json_request("POST", "/quote/submit", payload))
        .await
        .unwrap();
    let (status, body) = response_json(response).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("Missing or empty selections"));

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM quote_requests")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn test_mistyped_field_is_a_400_json_error() {
    let pool = test_pool().await;
    let dir = tempfile::tempdir().unwrap();
    let router = test_router(pool, dir.path());

    let mut payload = valid_payload();
    payload["companyName"] = json!(123);
    let response = router
        .oneshot(json_request("POST", "/quote/submit", payload))
        .await
        .unwrap();
    let (status, body) = response_json(response).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("Invalid request body"));
}

#[tokio::test]
async fn test_notification_failure_does_not_affect_the_response() {
    let pool = test_pool().await;
    let dir = tempfile::tempdir().unwrap();
    // Notifier pointed at an SMTP port nothing listens on.
    let router = test_router_with_failing_notifier(pool.clone(), dir.path());

    let response = router
        .oneshot(json_request("POST", "/quote/submit", valid_payload()))
        .await
        .unwrap();
    let (status, body) = response_json(response).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["quoteId"], json!(1));

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM quote_requests")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn test_storage_failure_returns_opaque_error() {
    let pool = test_pool().await;
    let dir = tempfile::tempdir().unwrap();
    let router = test_router(pool.clone(), dir.path());
    pool.close().await;

    let response = router
        .oneshot(json_request("POST", "/quote/submit", valid_payload()))
        .await
        .unwrap();
    let (status, body) = response_json(response).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Failed to save quote request" }));
}

#[tokio::test]
async fn test_catalog_endpoint_serves_steps_with_cache_header() {
    let pool = test_pool().await;
    let dir = tempfile::tempdir().unwrap();
    let router = test_router(pool, dir.path());

    let response = router
        .oneshot(Request::builder().uri("/quote/data").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(
        response.headers().get(header::CACHE_CONTROL).unwrap(),
        "public, s-maxage=3600, stale-while-revalidate=86400"
    );
    let (status, body) = response_json(response).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["steps"].as_array().unwrap().len(), 4);
    assert_eq!(body["steps"][0]["title"], json!("Type de Service"));
}
