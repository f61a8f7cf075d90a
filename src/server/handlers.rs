use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use tracing::debug;

use crate::analysis::{CardSource, RenderedCard};
use crate::error::Result;
use crate::models::{PokemonCardData, UserStats};
use crate::render::{render_error_badge, render_error_card};
use crate::server::rate_limiter::RateLimiter;
use crate::server::validate_username;

pub const SVG_CONTENT_TYPE: &str = "image/svg+xml; charset=utf-8";
pub const CACHE_SUCCESS: &str = "public, max-age=3600, stale-while-revalidate=86400";
pub const CACHE_ERROR: &str = "public, max-age=300";

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn CardSource>,
    pub rate_limiter: Arc<RateLimiter>,
}

impl AppState {
    pub fn new(source: Arc<dyn CardSource>, requests_per_minute: u32) -> Self {
        Self::with_rate_limiter(source, RateLimiter::new(requests_per_minute))
    }

    pub fn with_rate_limiter(source: Arc<dyn CardSource>, rate_limiter: RateLimiter) -> Self {
        Self {
            source,
            rate_limiter: Arc::new(rate_limiter),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct CardParams {
    #[serde(default)]
    pub full: bool,
}

/// GET /health
pub async fn health_check() -> &'static str {
    "ok"
}

/// GET /api/card/:username - Card data as JSON
pub async fn get_card(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Query(params): Query<CardParams>,
) -> Result<Response> {
    debug!("Card request: {} (full: {})", username, params.full);
    let username = validate_username(&username)?;

    let data: PokemonCardData = state.source.card_data(username, params.full).await?;
    Ok(([(header::CACHE_CONTROL, CACHE_SUCCESS)], Json(data)).into_response())
}

/// GET /api/stats/:username - Derived statistics
pub async fn get_stats(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Response> {
    debug!("Stats request: {}", username);
    let username = validate_username(&username)?;

    let stats: UserStats = state.source.user_stats(username).await?;
    Ok(([(header::CACHE_CONTROL, CACHE_SUCCESS)], Json(stats)).into_response())
}

/// GET /api/card/:username/svg - Trading card image
pub async fn get_card_svg(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Query(params): Query<CardParams>,
) -> Response {
    debug!("Card SVG request: {} (full: {})", username, params.full);
    match validate_username(&username) {
        Ok(username) => svg_response(state.source.render_card(username, params.full).await),
        Err(e) => invalid_svg(render_error_card(&username, &e.public_message())),
    }
}

/// GET /api/badge/:username - Compact badge image
pub async fn get_badge(State(state): State<AppState>, Path(username): Path<String>) -> Response {
    debug!("Badge request: {}", username);
    match validate_username(&username) {
        Ok(username) => svg_response(state.source.render_badge(username).await),
        Err(e) => invalid_svg(render_error_badge(&e.public_message())),
    }
}

/// Lookup failures still answer 200 so embedded images render.
fn svg_response(rendered: RenderedCard) -> Response {
    let cache = if rendered.is_error { CACHE_ERROR } else { CACHE_SUCCESS };
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, SVG_CONTENT_TYPE), (header::CACHE_CONTROL, cache)],
        rendered.svg,
    )
        .into_response()
}

fn invalid_svg(svg: String) -> Response {
    (
        StatusCode::BAD_REQUEST,
        [(header::CONTENT_TYPE, SVG_CONTENT_TYPE), (header::CACHE_CONTROL, CACHE_ERROR)],
        svg,
    )
        .into_response()
}
