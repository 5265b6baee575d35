use std::sync::Arc;

use axum::Router;
use tracing::{info, warn};

use crate::config::{
    AppConfig, AuthConfig, ContentConfig, DatabaseConfig, EmailConfig,
};
use crate::handler::newsletter_handler::NewsletterHandlerState;
use crate::handler::quote_handler::QuoteHandlerState;
use crate::handler::realisation_handler::RealisationHandlerState;
use crate::handler::tracking_handler::TrackingHandlerState;
use crate::middlewares::AdminAuthState;
use crate::repository::newsletter_repo::SqliteNewsletterRepository;
use crate::repository::quote_repo::SqliteQuoteRequestRepository;
use crate::repository::run_migrations;
use crate::repository::tracking_repo::SqliteTrackingRepository;
use crate::router::build_router;
use crate::service::catalog_service::load_catalog;
use crate::service::newsletter_service::NewsletterServiceImpl;
use crate::service::quote_service::{QuoteNotifier, QuoteServiceImpl};
use crate::service::realisation_service::RealisationStore;
use crate::service::tracking_service::TrackingServiceImpl;
use crate::util::email::SmtpEmailService;
use crate::util::session::OAuthSessionVerifier;

pub struct App {
    pub config: AppConfig,
    pub router: Router,
}

impl App {
    /// Load configuration, open the database, run migrations and wire
    /// every service into the router. Email is optional: without SMTP
    /// configuration the app runs with notifications disabled.
    pub async fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let config = AppConfig::from_env();

        let db_config = DatabaseConfig::from_env()?;
        db_config.validate()?;
        let pool = db_config.connect().await?;
        run_migrations(&pool).await?;
        info!("Database ready at {}", db_config.url);

        let http_client = reqwest::Client::new();
        let catalog = Arc::new(load_catalog(&http_client, config.catalog_url.as_deref()).await?);

        let email = match EmailConfig::from_env() {
            Ok(email_config) => {
                email_config.validate()?;
                Some(Arc::new(SmtpEmailService::new(email_config)?))
            }
            Err(e) => {
                warn!("Email disabled, notifications will be skipped: {}", e);
                None
            }
        };
        let notifier = email
            .clone()
            .map(|service| Arc::new(QuoteNotifier::new(service, config.admin_email.clone())));

        let quote_repo = Arc::new(SqliteQuoteRequestRepository::new(pool.clone()));
        let quote_service = Arc::new(QuoteServiceImpl::new(quote_repo, catalog.clone(), notifier));

        let newsletter_repo = Arc::new(SqliteNewsletterRepository::new(pool.clone()));
        let newsletter_service = Arc::new(NewsletterServiceImpl::new(newsletter_repo, email));

        let tracking_repo = Arc::new(SqliteTrackingRepository::new(pool.clone()));
        let tracking_service = Arc::new(TrackingServiceImpl::new(tracking_repo));

        let content_config = ContentConfig::from_env();
        let store = Arc::new(RealisationStore::new(&content_config));

        let auth_config = AuthConfig::from_env()?;
        auth_config.validate()?;
        let sessions = Arc::new(OAuthSessionVerifier::new(&auth_config)?);

        let development = config.is_development();
        let router = build_router(
            QuoteHandlerState { service: quote_service, catalog, development },
            NewsletterHandlerState { service: newsletter_service, development },
            TrackingHandlerState { service: tracking_service },
            RealisationHandlerState { store, development },
            AdminAuthState { sessions },
        );

        Ok(App { config, router })
    }

    pub async fn start(self) -> Result<(), Box<dyn std::error::Error>> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let listener = tokio::net::TcpListener::bind(&addr).await?;
        info!("Listening on {}", addr);
        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => warn!("Failed to install SIGTERM handler: {}", e),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received");
}
