use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use tracing::error;

use crate::dto::quote_dto::{
    QuoteListResponse, QuoteResponse, SubmitQuoteRequest, SubmitQuoteResponse,
    UpdateQuoteStatusRequest,
};
use crate::handler::map_service_error;
use crate::model::catalog::QuoteCatalog;
use crate::model::quote::QuoteStatus;
use crate::service::quote_service::QuoteService;
use crate::util::error::{HandlerError, ServiceError};

#[derive(Clone)]
pub struct QuoteHandlerState {
    pub service: Arc<dyn QuoteService>,
    pub catalog: Arc<QuoteCatalog>,
    pub development: bool,
}

/// POST /quote/submit. A malformed or mistyped body is a 400 with the
/// usual `{error}` shape, never the extractor's plain-text rejection.
pub async fn submit_quote_handler(
    State(state): State<QuoteHandlerState>,
    payload: Result<Json<SubmitQuoteRequest>, JsonRejection>,
) -> Result<Json<SubmitQuoteResponse>, HandlerError> {
    let Json(payload) = payload.map_err(|_| HandlerError::bad_request("Invalid request body"))?;
    match state.service.submit(payload).await {
        Ok(quote) => Ok(Json(SubmitQuoteResponse {
            success: true,
            message: "Quote request submitted successfully".to_string(),
            quote_id: quote.id,
        })),
        Err(ServiceError::InvalidInput(msg)) => Err(HandlerError::bad_request(msg)),
        Err(e) => {
            error!("Quote submission failed: {}", e);
            Err(HandlerError::internal("Failed to save quote request")
                .with_details(state.development.then(|| e.to_string())))
        }
    }
}

/// GET /quote/data, the wizard catalog. Served with a long shared cache
/// lifetime since the catalog only changes with a deploy.
pub async fn quote_data_handler(State(state): State<QuoteHandlerState>) -> Response {
    let mut response = Json(state.catalog.as_ref().clone()).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static("public, s-maxage=3600, stale-while-revalidate=86400"),
    );
    response
}

/// GET /admin/quotes
pub async fn list_quotes_handler(
    State(state): State<QuoteHandlerState>,
) -> Result<Json<QuoteListResponse>, HandlerError> {
    let quotes = state
        .service
        .list_quotes()
        .await
        .map_err(|e| map_service_error(e, state.development))?;
    Ok(Json(QuoteListResponse { quotes }))
}

/// GET /admin/quotes/{id}
pub async fn get_quote_handler(
    State(state): State<QuoteHandlerState>,
    Path(id): Path<i64>,
) -> Result<Json<QuoteResponse>, HandlerError> {
    let quote = state
        .service
        .get_quote(id)
        .await
        .map_err(|e| map_service_error(e, state.development))?
        .ok_or_else(|| HandlerError::not_found("Quote request not found"))?;
    Ok(Json(QuoteResponse { quote }))
}

/// PATCH /admin/quotes/{id}. Only recognized status values are
/// accepted; anything else is a 400, never a silent default.
pub async fn update_quote_status_handler(
    State(state): State<QuoteHandlerState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateQuoteStatusRequest>,
) -> Result<Json<QuoteResponse>, HandlerError> {
    let status = payload
        .status
        .as_deref()
        .and_then(QuoteStatus::parse)
        .ok_or_else(|| {
            HandlerError::bad_request("Invalid status: expected 'pending' or 'completed'")
        })?;

    let quote = state
        .service
        .update_quote_status(id, status)
        .await
        .map_err(|e| match e {
            ServiceError::NotFound(_) => HandlerError::not_found("Quote request not found"),
            other => map_service_error(other, state.development),
        })?;
    Ok(Json(QuoteResponse { quote }))
}

/// DELETE /admin/quotes/{id}
pub async fn delete_quote_handler(
    State(state): State<QuoteHandlerState>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, HandlerError> {
    state.service.delete_quote(id).await.map_err(|e| match e {
        ServiceError::NotFound(_) => HandlerError::not_found("Quote request not found"),
        other => map_service_error(other, state.development),
    })?;
    Ok(Json(serde_json::json!({ "success": true })))
}
