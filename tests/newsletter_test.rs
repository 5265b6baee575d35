mod common;

use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;

use common::{json_request, response_json, test_pool, test_router};

#[tokio::test]
async fn test_fresh_subscription_succeeds() {
    let pool = test_pool().await;
    let dir = tempfile::tempdir().unwrap();
    let router = test_router(pool.clone(), dir.path());

    let response = router
        .oneshot(json_request(
            "POST",
            "/newsletter/subscribe",
            json!({ "email": "reader@test.com" }),
        ))
        .await
        .unwrap();
    let (status, body) = response_json(response).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));

    let (db_status, source): (String, String) = sqlx::query_as(
        "SELECT status, source FROM newsletter_subscriptions WHERE email = 'reader@test.com'",
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(db_status, "active");
    assert_eq!(source, "website");
}

#[tokio::test]
async fn test_active_duplicate_is_a_conflict() {
    let pool = test_pool().await;
    let dir = tempfile::tempdir().unwrap();
    let router = test_router(pool.clone(), dir.path());

    let payload = json!({ "email": "reader@test.com" });
    let response = router
        .clone()
        .oneshot(json_request("POST", "/newsletter/subscribe", payload.clone()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = router
        .oneshot(json_request("POST", "/newsletter/subscribe", payload))
        .await
        .unwrap();
    let (status, body) = response_json(response).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], json!("Email already subscribed"));

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM newsletter_subscriptions")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn test_unsubscribed_address_is_reactivated() {
    let pool = test_pool().await;
    let dir = tempfile::tempdir().unwrap();
    let router = test_router(pool.clone(), dir.path());

    let payload = json!({ "email": "reader@test.com" });
    let response = router
        .clone()
        .oneshot(json_request("POST", "/newsletter/subscribe", payload.clone()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    sqlx::query(
        "UPDATE newsletter_subscriptions \
         SET status = 'unsubscribed', unsubscribed_at = datetime('now') \
         WHERE email = 'reader@test.com'",
    )
    .execute(&pool)
    .await
    .unwrap();

    let response = router
        .oneshot(json_request("POST", "/newsletter/subscribe", payload))
        .await
        .unwrap();
    let (status, body) = response_json(response).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));

    let (db_status, unsubscribed_at): (String, Option<String>) = sqlx::query_as(
        "SELECT status, unsubscribed_at FROM newsletter_subscriptions \
         WHERE email = 'reader@test.com'",
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(db_status, "active");
    assert_eq!(unsubscribed_at, None);
}

#[tokio::test]
async fn test_invalid_email_is_rejected() {
    let pool = test_pool().await;
    let dir = tempfile::tempdir().unwrap();
    let router = test_router(pool, dir.path());

    let response = router
        .oneshot(json_request(
            "POST",
            "/newsletter/subscribe",
            json!({ "email": "not-an-email" }),
        ))
        .await
        .unwrap();
    let (status, body) = response_json(response).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("Invalid email format"));
}

#[tokio::test]
async fn test_subscription_email_is_normalized() {
    let pool = test_pool().await;
    let dir = tempfile::tempdir().unwrap();
    let router = test_router(pool.clone(), dir.path());

    let response = router
        .oneshot(json_request(
            "POST",
            "/newsletter/subscribe",
            json!({ "email": "Reader@Test.COM" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let stored: String =
        sqlx::query_scalar("SELECT email FROM newsletter_subscriptions")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(stored, "reader@test.com");
}
