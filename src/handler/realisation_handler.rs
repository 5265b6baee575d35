use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::dto::realisation_dto::{
    CreateRealisationRequest, RealisationDocumentResponse, RealisationListResponse,
    RealisationMutationResponse, UpdateRealisationRequest,
};
use crate::handler::map_service_error;
use crate::service::realisation_service::RealisationStore;
use crate::util::error::HandlerError;

#[derive(Clone)]
pub struct RealisationHandlerState {
    pub store: Arc<RealisationStore>,
    pub development: bool,
}

/// GET /admin/realisations
pub async fn list_realisations_handler(
    State(state): State<RealisationHandlerState>,
) -> Result<Json<RealisationListResponse>, HandlerError> {
    let realisations = state
        .store
        .list()
        .await
        .map_err(|e| map_service_error(e, state.development))?;
    Ok(Json(RealisationListResponse { realisations }))
}

/// GET /admin/realisations/{slug}
pub async fn get_realisation_handler(
    State(state): State<RealisationHandlerState>,
    Path(slug): Path<String>,
) -> Result<Json<RealisationDocumentResponse>, HandlerError> {
    let (frontmatter, content) = state
        .store
        .get(&slug)
        .await
        .map_err(|e| map_service_error(e, state.development))?
        .ok_or_else(|| HandlerError::not_found("Realisation not found"))?;
    Ok(Json(RealisationDocumentResponse { slug, frontmatter, content }))
}

/// POST /admin/realisations
pub async fn create_realisation_handler(
    State(state): State<RealisationHandlerState>,
    Json(payload): Json<CreateRealisationRequest>,
) -> Result<Json<RealisationMutationResponse>, HandlerError> {
    if payload.slug.is_empty() {
        return Err(HandlerError::bad_request("Missing slug"));
    }
    let (Some(frontmatter), Some(content)) = (payload.frontmatter, payload.content) else {
        return Err(HandlerError::bad_request("Missing frontmatter or content"));
    };
    state
        .store
        .create(&payload.slug, &frontmatter, &content)
        .await
        .map_err(|e| map_service_error(e, state.development))?;
    Ok(Json(RealisationMutationResponse { success: true, slug: payload.slug }))
}

/// PUT /admin/realisations/{slug}. An optional `newSlug` renames the
/// entry; the response carries the slug it now lives under.
pub async fn update_realisation_handler(
    State(state): State<RealisationHandlerState>,
    Path(slug): Path<String>,
    Json(payload): Json<UpdateRealisationRequest>,
) -> Result<Json<RealisationMutationResponse>, HandlerError> {
    let frontmatter = payload.frontmatter.unwrap_or_default();
    let content = payload.content.unwrap_or_default();
    let final_slug = state
        .store
        .update(&slug, &frontmatter, &content, payload.new_slug.as_deref())
        .await
        .map_err(|e| map_service_error(e, state.development))?;
    Ok(Json(RealisationMutationResponse { success: true, slug: final_slug }))
}

/// DELETE /admin/realisations/{slug}
pub async fn delete_realisation_handler(
    State(state): State<RealisationHandlerState>,
    Path(slug): Path<String>,
) -> Result<Json<RealisationMutationResponse>, HandlerError> {
    state
        .store
        .delete(&slug)
        .await
        .map_err(|e| map_service_error(e, state.development))?;
    Ok(Json(RealisationMutationResponse { success: true, slug }))
}
