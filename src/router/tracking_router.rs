use axum::{routing::post, Router};

use crate::handler::tracking_handler::{record_tracking_handler, TrackingHandlerState};

pub fn routes(state: TrackingHandlerState) -> Router {
    Router::new()
        .route("/tracking/google-id", post(record_tracking_handler))
        .with_state(state)
}
