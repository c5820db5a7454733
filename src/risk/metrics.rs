use crate::contract::{OptionSpec, OptionType, CONTRACT_MULTIPLIER};
use crate::errors::EngineResult;
use crate::feeds::MarketSnapshot;
use crate::models::black_scholes::d1_d2;
use crate::models::normal::norm_cdf;
use crate::models::PricingParams;
use crate::risk::greeks::Greeks;
use serde::{Serialize, Serializer};

/// Best case for a long position, per contract.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MaxReturn {
    /// Long call upside has no ceiling.
    Unlimited,
    Bounded(f64),
}

impl Serialize for MaxReturn {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Unlimited => serializer.serialize_str("Unlimited"),
            Self::Bounded(v) => serializer.serialize_f64(*v),
        }
    }
}

/// Point-in-time risk bundle for the position at the current spot and the
/// full remaining life. Computed once per request, not per grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RiskMetrics {
    pub current_price: f64,
    pub strike: f64,
    pub premium: f64,
    /// Cash paid for one contract.
    pub entry_cost: f64,
    pub breakeven_price: f64,
    /// Risk-neutral probability of finishing past breakeven, in percent.
    pub probability_profit: f64,
    pub max_risk: f64,
    pub max_return: MaxReturn,
    pub volatility: f64,
    #[serde(flatten)]
    pub greeks: Greeks,
}

impl RiskMetrics {
    pub fn compute(spec: &OptionSpec, snapshot: &MarketSnapshot, ttl_years: f64) -> EngineResult<Self> {
        let params = PricingParams::new(
            snapshot.spot_price,
            spec.strike,
            ttl_years,
            snapshot.risk_free_rate,
            snapshot.volatility,
            spec.option_type,
        );
        let greeks = Greeks::compute(&params)?;

        let breakeven = breakeven(spec);
        let max_risk = spec.premium * CONTRACT_MULTIPLIER;

        Ok(Self {
            current_price: snapshot.spot_price,
            strike: spec.strike,
            premium: spec.premium,
            entry_cost: max_risk,
            breakeven_price: breakeven,
            probability_profit: probability_of_profit(&params, breakeven),
            max_risk,
            max_return: max_return(spec),
            volatility: snapshot.volatility,
            greeks,
        })
    }
}

/// Underlying price at expiry where the position nets zero.
#[inline]
pub fn breakeven(spec: &OptionSpec) -> f64 {
    match spec.option_type {
        OptionType::Call => spec.strike + spec.premium,
        OptionType::Put => spec.strike - spec.premium,
    }
}

/// Phi(d2) (call) or Phi(-d2) (put) with d2 taken at the breakeven price,
/// as a percentage in [0, 100]. `params` must already be validated.
pub fn probability_of_profit(params: &PricingParams, breakeven: f64) -> f64 {
    if breakeven <= 0.0 {
        // Put premium at or above strike: the underlying cannot fall below zero.
        return 0.0;
    }
    let (_, d2) = d1_d2(&PricingParams {
        strike: breakeven,
        ..*params
    });
    let p = match params.option_type {
        OptionType::Call => norm_cdf(d2),
        OptionType::Put => norm_cdf(-d2),
    };
    (p * 100.0).clamp(0.0, 100.0)
}

/// Long put pays at most strike - premium (underlying to zero).
#[inline]
pub fn max_return(spec: &OptionSpec) -> MaxReturn {
    match spec.option_type {
        OptionType::Call => MaxReturn::Unlimited,
        OptionType::Put => MaxReturn::Bounded((spec.strike.max(0.0) - spec.premium) * CONTRACT_MULTIPLIER),
    }
}
