pub mod routes;

use crate::errors::{EngineError, EngineResult};
use crate::state::AppState;
use axum::http::HeaderValue;
use axum::routing::get;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

/// HTTP surface: one pricing route, one chain listing, one health probe.
pub fn router(state: Arc<AppState>) -> EngineResult<axum::Router> {
    let cors = cors_layer(&state.config.cors_origin)?;

    Ok(axum::Router::new()
        .route("/heatmap", get(routes::get_heatmap))
        .route("/options", get(routes::get_options))
        .route("/health", get(routes::get_health))
        .layer(cors)
        .with_state(state))
}

fn cors_layer(origin: &str) -> EngineResult<CorsLayer> {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origin.trim() == "*" {
        return Ok(layer.allow_origin(Any));
    }
    let origin = HeaderValue::from_str(origin.trim())
        .map_err(|e| EngineError::Config(format!("CORS_ORIGIN '{origin}': {e}")))?;
    Ok(layer.allow_origin(origin))
}
