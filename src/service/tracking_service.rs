use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info, instrument};

use crate::dto::tracking_dto::TrackingRequest;
use crate::repository::tracking_repo::TrackingRepository;
use crate::util::error::ServiceError;

#[async_trait]
pub trait TrackingService: Send + Sync {
    /// Record an ad-attributed visit. Storage failures are swallowed:
    /// tracking must never break the visitor-facing flow, so only a
    /// missing advertising id is reported back.
    async fn record(&self, request: TrackingRequest) -> Result<(), ServiceError>;
}

pub struct TrackingServiceImpl {
    pub repo: Arc<dyn TrackingRepository>,
}

impl TrackingServiceImpl {
    pub fn new(repo: Arc<dyn TrackingRepository>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl TrackingService for TrackingServiceImpl {
    #[instrument(skip(self, request))]
    async fn record(&self, request: TrackingRequest) -> Result<(), ServiceError> {
        if request.advertising_id.is_empty() {
            return Err(ServiceError::InvalidInput("Missing advertisingId".to_string()));
        }

        match self
            .repo
            .record_visit(
                &request.advertising_id,
                request.client_id.as_deref(),
                request.session_id.as_deref(),
            )
            .await
        {
            Ok(()) => info!(advertising_id = %request.advertising_id, "Tracking visit recorded"),
            Err(e) => error!(
                advertising_id = %request.advertising_id,
                "Failed to record tracking visit: {}", e
            ),
        }
        Ok(())
    }
}
