use std::sync::Arc;

use axum::{extract::State, Json};
use validator::Validate;

use crate::dto::newsletter_dto::{SubscribeRequest, SubscribeResponse};
use crate::handler::map_service_error;
use crate::service::newsletter_service::{NewsletterService, SubscribeOutcome};
use crate::util::error::HandlerError;

/// Recorded as the `source` of every subscription taken through this
/// endpoint.
const WEBSITE_SOURCE: &str = "website";

#[derive(Clone)]
pub struct NewsletterHandlerState {
    pub service: Arc<dyn NewsletterService>,
    pub development: bool,
}

/// POST /newsletter/subscribe
pub async fn subscribe_handler(
    State(state): State<NewsletterHandlerState>,
    Json(payload): Json<SubscribeRequest>,
) -> Result<Json<SubscribeResponse>, HandlerError> {
    payload
        .validate()
        .map_err(|_| HandlerError::bad_request("Invalid email format"))?;

    let outcome = state
        .service
        .subscribe(&payload.email, WEBSITE_SOURCE)
        .await
        .map_err(|e| map_service_error(e, state.development))?;

    match outcome {
        SubscribeOutcome::AlreadySubscribed => {
            Err(HandlerError::conflict("Email already subscribed"))
        }
        SubscribeOutcome::Subscribed(_) | SubscribeOutcome::Resubscribed(_) => {
            Ok(Json(SubscribeResponse {
                success: true,
                message: "Successfully subscribed to newsletter".to_string(),
            }))
        }
    }
}
