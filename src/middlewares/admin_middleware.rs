use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use tracing::debug;

use crate::util::error::HandlerError;
use crate::util::session::SessionVerifier;

#[derive(Clone)]
pub struct AdminAuthState {
    pub sessions: Arc<dyn SessionVerifier>,
}

/// Guard for the back-office routes. No valid session is a 401, a valid
/// session without the admin flag is a 403. The resolved principal is
/// stored in request extensions for downstream handlers.
pub async fn admin_auth(
    State(state): State<AdminAuthState>,
    mut request: Request,
    next: Next,
) -> Result<Response, HandlerError> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .unwrap_or("");

    let principal = state.sessions.verify(token).await.map_err(|e| {
        debug!("Admin auth rejected: {}", e);
        HandlerError::unauthorized()
    })?;

    if !principal.is_admin {
        debug!(email = %principal.email, "Non-admin session on admin route");
        return Err(HandlerError::forbidden());
    }

    request.extensions_mut().insert(principal);
    Ok(next.run(request).await)
}
