pub mod grid;
pub mod surface;

use crate::config::PricingConfig;
use crate::contract::{days_to_years, OptionSpec};
use crate::errors::EngineResult;
use crate::feeds::{self, MarketDataProvider, MarketSnapshot, VolatilitySource};
use crate::models::{ModelKind, Pricer, PricingModel, PricingParams};
use crate::risk::metrics::RiskMetrics;
use chrono::NaiveDate;
use grid::PricingGrid;
use std::time::Instant;

/// Raw request fields as they arrive from the client.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct HeatmapRequest {
    pub ticker: String,
    pub strike: f64,
    pub premium: f64,
    #[serde(rename = "type")]
    pub option_type: String,
    /// `YYYY-MM-DD`
    pub expiry: String,
    pub model: String,
}

/// Profit surface plus point-in-time metrics.
///
/// Axis mapping: `y` is the price axis (rows of `z`), `x` is the time axis
/// in days (columns of `z`), so `z[i][j]` is the profit at `y[i]`, `x[j]`.
/// Both axes descend; the last `x` entry is the at-expiry sentinel.
#[derive(Debug, Clone, serde::Serialize)]
pub struct HeatmapReport {
    pub z: Vec<Vec<f64>>,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub metrics: RiskMetrics,
    pub model: ModelKind,
    pub volatility_source: VolatilitySource,
}

/// Full request pipeline: validate, check expiry, fetch market state,
/// then price. Input errors and expiry are reported before the provider is
/// touched or any model runs.
pub fn analyze(
    request: &HeatmapRequest,
    provider: &dyn MarketDataProvider,
    config: &PricingConfig,
    today: NaiveDate,
) -> EngineResult<HeatmapReport> {
    let spec = OptionSpec::parse(
        request.strike,
        request.premium,
        &request.option_type,
        &request.expiry,
    )?;
    let kind: ModelKind = request.model.parse()?;
    let days_to_expiry = spec.days_to_expiry(today)?;
    let pricer = Pricer::for_kind(kind, config)?;

    tracing::info!(
        ticker = %request.ticker,
        model = pricer.name(),
        option_type = %spec.option_type,
        strike = spec.strike,
        days = days_to_expiry,
        "heatmap request accepted"
    );

    let snapshot = feeds::resolve_snapshot(
        provider,
        &request.ticker,
        &spec,
        config.risk_free_rate,
        config.vol_lookback,
        today,
    )?;

    price_surface(&spec, &pricer, &snapshot, days_to_expiry)
}

/// Pure pricing step: build the grid, evaluate every cell, compute metrics.
pub fn price_surface(
    spec: &OptionSpec,
    pricer: &Pricer,
    snapshot: &MarketSnapshot,
    days_to_expiry: u32,
) -> EngineResult<HeatmapReport> {
    let started = Instant::now();

    let grid = PricingGrid::build(snapshot.spot_price, days_to_expiry)?;
    let ttl_years = days_to_years(f64::from(days_to_expiry));
    let base = PricingParams::new(
        snapshot.spot_price,
        spec.strike,
        ttl_years,
        snapshot.risk_free_rate,
        snapshot.volatility,
        spec.option_type,
    );

    let z = surface::evaluate(pricer, &base, &grid, spec.premium)?;
    let metrics = RiskMetrics::compute(spec, snapshot, ttl_years)?;

    tracing::info!(
        model = pricer.name(),
        rows = grid.prices.len(),
        cols = grid.days.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "heatmap evaluated"
    );

    Ok(HeatmapReport {
        z,
        x: grid.days,
        y: grid.prices,
        metrics,
        model: pricer.kind(),
        volatility_source: snapshot.volatility_source,
    })
}
