use crate::errors::EngineError;
use crate::feeds;
use crate::heatmap::{self, HeatmapRequest};
use crate::state::AppState;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use std::sync::Arc;

/// Expiries listed by /options.
const OPTION_EXPIRIES: usize = 3;

#[derive(serde::Deserialize)]
pub struct OptionsQuery {
    pub ticker: String,
}

/// GET /heatmap -- profit surface + metrics for one contract.
/// Pricing is CPU bound, so it runs on the blocking pool.
pub async fn get_heatmap(
    State(state): State<Arc<AppState>>,
    query: Result<Query<HeatmapRequest>, QueryRejection>,
) -> Response {
    let Query(request) = match query {
        Ok(q) => q,
        Err(rejection) => return rejected(rejection).into_response(),
    };
    let today = chrono::Local::now().date_naive();
    let ticker = request.ticker.clone();

    let result = tokio::task::spawn_blocking(move || {
        heatmap::analyze(&request, state.provider.as_ref(), &state.config.pricing, today)
    })
    .await;

    match result {
        Ok(Ok(report)) => Json(serde_json::json!({ "heatmap": report })).into_response(),
        Ok(Err(e)) => {
            tracing::warn!(ticker = %ticker, kind = e.kind(), error = %e, "heatmap request failed");
            e.into_response()
        }
        Err(e) => {
            tracing::error!(ticker = %ticker, error = %e, "heatmap worker did not complete");
            error_body(StatusCode::INTERNAL_SERVER_ERROR, "internal", "pricing task failed")
        }
    }
}

/// GET /options -- listed contracts for the nearest expiries.
pub async fn get_options(
    State(state): State<Arc<AppState>>,
    query: Result<Query<OptionsQuery>, QueryRejection>,
) -> Response {
    let Query(params) = match query {
        Ok(q) => q,
        Err(rejection) => return rejected(rejection).into_response(),
    };
    match feeds::list_contracts(state.provider.as_ref(), &params.ticker, OPTION_EXPIRIES) {
        Ok(contracts) => Json(serde_json::json!({ "contracts": contracts })).into_response(),
        Err(e) => {
            tracing::warn!(ticker = %params.ticker, error = %e, "options lookup failed");
            e.into_response()
        }
    }
}

/// GET /health
pub async fn get_health(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "provider": state.provider.name(),
    }))
}

/// Missing or malformed query fields are bad input like any other.
fn rejected(rejection: QueryRejection) -> EngineError {
    tracing::warn!(error = %rejection.body_text(), "query rejected");
    EngineError::InvalidInput(rejection.body_text())
}

pub fn status_for(e: &EngineError) -> StatusCode {
    match e {
        EngineError::InvalidInput(_) | EngineError::SimulationConfig(_) => StatusCode::BAD_REQUEST,
        EngineError::ExpiredContract { .. } | EngineError::NumericalDomain(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        EngineError::DataUnavailable(_) => StatusCode::NOT_FOUND,
        EngineError::Config(_) | EngineError::Parse(_) | EngineError::Io(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for EngineError {
    fn into_response(self) -> Response {
        error_body(status_for(&self), self.kind(), &self.to_string())
    }
}

fn error_body(status: StatusCode, kind: &str, message: &str) -> Response {
    (
        status,
        Json(serde_json::json!({ "error": { "kind": kind, "message": message } })),
    )
        .into_response()
}
