use axum::{routing::post, Router};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::models::AppState;

pub fn build_router(state: AppState) -> Router {
    let register = post(handlers::register_post).fallback(handlers::method_not_allowed);

    Router::new()
        .route("/api/register", register.clone())
        .route("/api/register/:role", register)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}
