#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, Response, StatusCode};
use axum::Router;

use atelier_backend::config::database_conf::DbPool;
use atelier_backend::config::{DatabaseConfig, EmailConfig};
use atelier_backend::handler::newsletter_handler::NewsletterHandlerState;
use atelier_backend::handler::quote_handler::QuoteHandlerState;
use atelier_backend::handler::realisation_handler::RealisationHandlerState;
use atelier_backend::handler::tracking_handler::TrackingHandlerState;
use atelier_backend::middlewares::AdminAuthState;
use atelier_backend::model::catalog::QuoteCatalog;
use atelier_backend::repository::newsletter_repo::SqliteNewsletterRepository;
use atelier_backend::repository::quote_repo::SqliteQuoteRequestRepository;
use atelier_backend::repository::run_migrations;
use atelier_backend::repository::tracking_repo::SqliteTrackingRepository;
use atelier_backend::router::build_router;
use atelier_backend::service::newsletter_service::NewsletterServiceImpl;
use atelier_backend::service::quote_service::{QuoteNotifier, QuoteServiceImpl};
use atelier_backend::service::realisation_service::RealisationStore;
use atelier_backend::service::tracking_service::TrackingServiceImpl;
use atelier_backend::util::email::SmtpEmailService;
use atelier_backend::util::session::{Principal, SessionError, SessionVerifier};

pub const ADMIN_TOKEN: &str = "admin-token";
pub const USER_TOKEN: &str = "user-token";

/// Resolves two fixed tokens instead of calling a real provider.
pub struct StubSessionVerifier;

#[async_trait]
impl SessionVerifier for StubSessionVerifier {
    async fn verify(&self, token: &str) -> Result<Principal, SessionError> {
        match token {
            ADMIN_TOKEN => Ok(Principal { email: "admin@test.com".to_string(), is_admin: true }),
            USER_TOKEN => Ok(Principal { email: "user@test.com".to_string(), is_admin: false }),
            _ => Err(SessionError::NoSession),
        }
    }
}

/// Fresh in-memory database with the schema applied. One connection so
/// every query sees the same memory store.
pub async fn test_pool() -> DbPool {
    let config = DatabaseConfig::from_test_env();
    let pool = config.connect().await.expect("in-memory pool");
    run_migrations(&pool).await.expect("migrations");
    pool
}

/// Full application router over the given pool, with notifications
/// disabled and realisations stored under `content_dir`.
pub fn test_router(pool: DbPool, content_dir: &Path) -> Router {
    build_test_router(pool, content_dir, None)
}

/// Same router, but with a notifier wired to an SMTP endpoint nothing
/// listens on; sends fail, which must stay invisible to callers.
pub fn test_router_with_failing_notifier(pool: DbPool, content_dir: &Path) -> Router {
    let email = Arc::new(
        SmtpEmailService::new(EmailConfig::from_test_env()).expect("smtp service"),
    );
    let notifier = Arc::new(QuoteNotifier::new(email, "admin@test.com".to_string()));
    build_test_router(pool, content_dir, Some(notifier))
}

fn build_test_router(
    pool: DbPool,
    content_dir: &Path,
    notifier: Option<Arc<QuoteNotifier>>,
) -> Router {
    let catalog = Arc::new(QuoteCatalog::bundled().expect("bundled catalog"));

    let quote_repo = Arc::new(SqliteQuoteRequestRepository::new(pool.clone()));
    let quote_service = Arc::new(QuoteServiceImpl::new(quote_repo, catalog.clone(), notifier));

    let newsletter_repo = Arc::new(SqliteNewsletterRepository::new(pool.clone()));
    let newsletter_service = Arc::new(NewsletterServiceImpl::new(newsletter_repo, None));

    let tracking_repo = Arc::new(SqliteTrackingRepository::new(pool));
    let tracking_service = Arc::new(TrackingServiceImpl::new(tracking_repo));

    let store = Arc::new(RealisationStore::with_dir(content_dir));

    build_router(
        QuoteHandlerState { service: quote_service, catalog, development: false },
        NewsletterHandlerState { service: newsletter_service, development: false },
        TrackingHandlerState { service: tracking_service },
        RealisationHandlerState { store, development: false },
        AdminAuthState { sessions: Arc::new(StubSessionVerifier) },
    )
}

pub fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn admin_json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {}", ADMIN_TOKEN))
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn admin_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", ADMIN_TOKEN))
        .body(Body::empty())
        .unwrap()
}

pub async fn response_json(response: Response<Body>) -> (StatusCode, serde_json::Value) {
    let status = response.status();
    let bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, value)
}
