pub mod quote_router;
pub mod newsletter_router;
pub mod tracking_router;
pub mod realisation_router;

use axum::{routing::get, Router};

use crate::handler::newsletter_handler::NewsletterHandlerState;
use crate::handler::quote_handler::QuoteHandlerState;
use crate::handler::realisation_handler::RealisationHandlerState;
use crate::handler::tracking_handler::TrackingHandlerState;
use crate::middlewares::AdminAuthState;

async fn health_handler() -> &'static str {
    "OK"
}

/// Compose the full application router. Public routes are open; every
/// `/admin` route sits behind the session guard.
pub fn build_router(
    quote_state: QuoteHandlerState,
    newsletter_state: NewsletterHandlerState,
    tracking_state: TrackingHandlerState,
    realisation_state: RealisationHandlerState,
    auth_state: AdminAuthState,
) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .merge(quote_router::public_routes(quote_state.clone()))
        .merge(quote_router::admin_routes(quote_state, auth_state.clone()))
        .merge(newsletter_router::routes(newsletter_state))
        .merge(tracking_router::routes(tracking_state))
        .merge(realisation_router::admin_routes(realisation_state, auth_state))
}
