use crate::contract::days_to_years;
use crate::errors::{EngineError, EngineResult};

/// Points on the underlying-price axis.
pub const PRICE_POINTS: usize = 25;

/// Half-width of the price band around spot (+/-10%).
pub const PRICE_BAND: f64 = 0.10;

/// Final time-axis entry, in days. Stands for "at expiry" while keeping
/// sigma*sqrt(T) away from zero (1e-4 days = 1/3_652_500 years).
pub const EXPIRY_SENTINEL_DAYS: f64 = 1e-4;

/// The two heatmap axes. Fixed once per request.
#[derive(Debug, Clone, PartialEq)]
pub struct PricingGrid {
    /// Underlying prices, descending from spot*(1+band) to spot*(1-band).
    pub prices: Vec<f64>,
    /// Days to expiry, descending from `days_to_expiry` to 1, then the sentinel.
    pub days: Vec<f64>,
}

impl PricingGrid {
    pub fn build(spot: f64, days_to_expiry: u32) -> EngineResult<Self> {
        if !spot.is_finite() || spot <= 0.0 {
            return Err(EngineError::InvalidInput(format!(
                "spot must be positive to build a price axis, got {spot}"
            )));
        }
        if days_to_expiry == 0 {
            return Err(EngineError::InvalidInput("days to expiry must be >= 1".into()));
        }

        let prices = linspace(spot * (1.0 + PRICE_BAND), spot * (1.0 - PRICE_BAND), PRICE_POINTS);

        let mut days: Vec<f64> = (1..=days_to_expiry).rev().map(f64::from).collect();
        days.push(EXPIRY_SENTINEL_DAYS);

        Ok(Self { prices, days })
    }

    /// Time axis converted to years, the unit every model takes.
    pub fn years(&self) -> impl Iterator<Item = f64> + '_ {
        self.days.iter().map(|&d| days_to_years(d))
    }

}

/// `n` evenly spaced values from `start` to `end`, both inclusive.
fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { end } else { start + step * i as f64 })
                .collect()
        }
    }
}
