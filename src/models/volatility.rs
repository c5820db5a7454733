use crate::errors::{EngineError, EngineResult};

/// Trading sessions per year used to annualize daily return volatility.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Default trailing window (closes) for the historical estimate: one year.
pub const DEFAULT_LOOKBACK: usize = 252;

/// A volatility is usable by the pricing formulas only if strictly positive.
#[inline]
pub fn is_usable(sigma: f64) -> bool {
    sigma.is_finite() && sigma > 0.0
}

/// Annualized volatility of daily log returns over the last `lookback`
/// closes.
///
/// sigma = std(ln(P_i / P_{i-1})) * sqrt(252)
///
/// Uses the population standard deviation (divide by n, not n-1), so the
/// same price series always yields the same estimate.
pub fn historical_volatility(closes: &[f64], lookback: usize) -> EngineResult<f64> {
    let window = &closes[closes.len().saturating_sub(lookback)..];
    if window.len() < 2 {
        return Err(EngineError::DataUnavailable(format!(
            "need at least 2 closes for historical volatility, have {}",
            window.len()
        )));
    }
    if let Some(bad) = window.iter().find(|p| !p.is_finite() || **p <= 0.0) {
        return Err(EngineError::DataUnavailable(format!(
            "close price {bad} is not positive"
        )));
    }

    let returns: Vec<f64> = window.windows(2).map(|w| (w[1] / w[0]).ln()).collect();
    let sigma = population_std(&returns) * TRADING_DAYS_PER_YEAR.sqrt();

    if !is_usable(sigma) {
        return Err(EngineError::DataUnavailable(
            "price history has zero realized volatility".into(),
        ));
    }
    Ok(sigma)
}

fn population_std(data: &[f64]) -> f64 {
    let n = data.len() as f64;
    let mean = data.iter().sum::<f64>() / n;
    let var = data.iter().map(|r| (r - mean) * (r - mean)).sum::<f64>() / n;
    var.sqrt()
}
