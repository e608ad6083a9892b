use axum::{
    Router,
    routing::{get, patch},
};

use super::handlers;
use super::handlers::probes::{healthz, livez};
use super::handlers::ui::home;
use super::state::AppState;

pub fn build_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .route(
            "/applications",
            get(handlers::applications::list).post(handlers::applications::create),
        )
        .route(
            "/applications/{id}",
            patch(handlers::applications::update).delete(handlers::applications::delete),
        )
        .route("/healthz", get(healthz))
        .route("/livez", get(livez))
        .with_state(state)
}
