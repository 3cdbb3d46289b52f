use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::handler::quote_handler::{
    admin_list_quotes_handler, create_quote_handler, decide_quote_handler, get_quote_handler,
    list_quotes_handler,
};
use crate::service::quote_service::QuoteServiceImpl;

pub fn quote_router(service: Arc<QuoteServiceImpl>) -> Router {
    // Customer-facing routes
    let public = Router::new()
        .route("/quotes", post(create_quote_handler).get(list_quotes_handler));

    // TODO: add admin authentication before these routes ship publicly
    let admin = Router::new()
        .route("/admin/quotes", get(admin_list_quotes_handler))
        .route(
            "/admin/quotes/{id}",
            get(get_quote_handler).patch(decide_quote_handler),
        );

    public.merge(admin).with_state(service)
}
