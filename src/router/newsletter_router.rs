use axum::{routing::post, Router};

use crate::handler::newsletter_handler::{subscribe_handler, NewsletterHandlerState};

pub fn routes(state: NewsletterHandlerState) -> Router {
    Router::new()
        .route("/newsletter/subscribe", post(subscribe_handler))
        .with_state(state)
}
