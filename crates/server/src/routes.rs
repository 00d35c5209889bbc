use axum::{
    extract::State,
    routing::{any, get},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::types::Health;

use crate::state::AppState;

pub mod admin;
pub mod coasters;

pub async fn health(State(state): State<AppState>) -> Json<Health> {
    Json(Health { status: "ok", coasters: state.store.len().await })
}

/// Build the full application router: coaster CRUD, the admin portal and health.
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    // `get` would also answer HEAD; only the listed verbs are served.
    // `/coasters/random` is a static segment, so it wins over `/coasters/:id`
    // and shadows a record whose id is literally "random".
    let coaster_routes = Router::new()
        .route(
            "/coasters",
            get(coasters::list_coasters)
                .post(coasters::create_coaster)
                .head(coasters::method_not_allowed)
                .fallback(coasters::method_not_allowed),
        )
        .route("/coasters/random", any(coasters::random_coaster))
        .route(
            "/coasters/:id",
            get(coasters::get_coaster)
                .put(coasters::update_coaster)
                .delete(coasters::delete_coaster)
                .head(coasters::method_not_allowed)
                .fallback(coasters::method_not_allowed),
        );

    Router::new()
        .route("/health", get(health))
        .route("/admin", any(admin::admin_portal))
        .merge(coaster_routes)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
