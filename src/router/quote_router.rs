use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::handler::quote_handler::{
    delete_quote_handler, get_quote_handler, list_quotes_handler, quote_data_handler,
    submit_quote_handler, update_quote_status_handler, QuoteHandlerState,
};
use crate::middlewares::{admin_auth, AdminAuthState};

pub fn public_routes(state: QuoteHandlerState) -> Router {
    Router::new()
        .route("/quote/submit", post(submit_quote_handler))
        .route("/quote/data", get(quote_data_handler))
        .with_state(state)
}

pub fn admin_routes(state: QuoteHandlerState, auth: AdminAuthState) -> Router {
    Router::new()
        .route("/admin/quotes", get(list_quotes_handler))
        .route(
            "/admin/quotes/{id}",
            get(get_quote_handler)
                .patch(update_quote_status_handler)
                .delete(delete_quote_handler),
        )
        .layer(middleware::from_fn_with_state(auth, admin_auth))
        .with_state(state)
}
