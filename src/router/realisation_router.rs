use axum::{middleware, routing::get, Router};

use crate::handler::realisation_handler::{
    create_realisation_handler, delete_realisation_handler, get_realisation_handler,
    list_realisations_handler, update_realisation_handler, RealisationHandlerState,
};
use crate::middlewares::{admin_auth, AdminAuthState};

pub fn admin_routes(state: RealisationHandlerState, auth: AdminAuthState) -> Router {
    Router::new()
        .route(
            "/admin/realisations",
            get(list_realisations_handler).post(create_realisation_handler),
        )
        .route(
            "/admin/realisations/{slug}",
            get(get_realisation_handler)
                .put(update_realisation_handler)
                .delete(delete_realisation_handler),
        )
        .layer(middleware::from_fn_with_state(auth, admin_auth))
        .with_state(state)
}
