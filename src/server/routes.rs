use std::time::Duration;

use axum::http::{header, Method};
use axum::{middleware, routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::server::handlers::{self, AppState};
use crate::server::rate_limiter::rate_limit;

pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/card/:username", get(handlers::get_card))
        .route("/card/:username/svg", get(handlers::get_card_svg))
        .route("/badge/:username", get(handlers::get_badge))
        .route("/stats/:username", get(handlers::get_stats));

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api", api_routes)
        .layer(middleware::from_fn_with_state(state.clone(), rate_limit))
        .layer(
            // Cards are embedded cross-origin
            CorsLayer::new()
                .allow_methods([Method::GET, Method::OPTIONS])
                .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
                .allow_origin(tower_http::cors::Any)
                .max_age(Duration::from_secs(3600)),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
