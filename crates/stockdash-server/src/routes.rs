//! HTTP routes

use crate::handlers;
use crate::state::AppState;
use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/companies", get(handlers::list_companies))
        .route("/stock/{symbol}", get(handlers::stock_history))
        .route("/forecast/{symbol}", get(handlers::forecast))
        .route("/compare", post(handlers::compare))
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::alive))
        .nest("/api", api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
