use std::sync::Arc;

use axum::{extract::State, Json};

use crate::dto::tracking_dto::{TrackingRequest, TrackingResponse};
use crate::service::tracking_service::TrackingService;
use crate::util::error::{HandlerError, ServiceError};

#[derive(Clone)]
pub struct TrackingHandlerState {
    pub service: Arc<dyn TrackingService>,
}

/// POST /tracking/google-id. Storage failures still produce a success
/// response; only a missing advertising id is a client error.
pub async fn record_tracking_handler(
    State(state): State<TrackingHandlerState>,
    Json(payload): Json<TrackingRequest>,
) -> Result<Json<TrackingResponse>, HandlerError> {
    match state.service.record(payload).await {
        Ok(()) => Ok(Json(TrackingResponse {
            success: true,
            message: "Tracking data recorded".to_string(),
        })),
        Err(ServiceError::InvalidInput(msg)) => Err(HandlerError::bad_request(msg)),
        Err(e) => Err(HandlerError::internal(e.to_string())),
    }
}
