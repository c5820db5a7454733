pub mod binomial;
pub mod black_scholes;
pub mod monte_carlo;
pub mod normal;
pub mod volatility;

use crate::config::PricingConfig;
use crate::contract::OptionType;
use crate::errors::{EngineError, EngineResult};
use std::str::FromStr;

use binomial::BinomialTree;
use black_scholes::BlackScholes;
use monte_carlo::MonteCarlo;

/// All valuation models implement this trait.
/// price() is a function of its inputs only; implementations hold
/// configuration (steps, paths, style) but no mutable state.
/// Send + Sync required so cells can be evaluated on the rayon pool.
pub trait PricingModel: Send + Sync {
    fn name(&self) -> &'static str;

    /// Theoretical value of one share of the option.
    /// Invalid inputs come back as `EngineError::NumericalDomain`, never NaN.
    fn price(&self, params: &PricingParams) -> EngineResult<f64>;
}

/// Inputs shared by every valuation model. Stack-allocated, Copy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricingParams {
    pub spot: f64,
    pub strike: f64,
    /// Time to expiry in years (days / 365.25).
    pub ttl_years: f64,
    /// Cost of carry b; equals `rate` when the underlying pays no yield.
    pub cost_of_carry: f64,
    pub rate: f64,
    pub sigma: f64,
    pub option_type: OptionType,
}

impl PricingParams {
    /// Parameters for an underlying with no yield (b = r).
    pub fn new(
        spot: f64,
        strike: f64,
        ttl_years: f64,
        rate: f64,
        sigma: f64,
        option_type: OptionType,
    ) -> Self {
        Self {
            spot,
            strike,
            ttl_years,
            cost_of_carry: rate,
            rate,
            sigma,
            option_type,
        }
    }

    #[inline]
    pub fn with_carry(mut self, cost_of_carry: f64) -> Self {
        self.cost_of_carry = cost_of_carry;
        self
    }

    /// Same contract and market, different grid cell.
    #[inline]
    pub fn at(&self, spot: f64, ttl_years: f64) -> Self {
        Self {
            spot,
            ttl_years,
            ..*self
        }
    }

    pub fn validate(&self) -> EngineResult<()> {
        let positive = [
            ("spot", self.spot),
            ("strike", self.strike),
            ("time to expiry", self.ttl_years),
            ("volatility", self.sigma),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(EngineError::NumericalDomain(format!(
                    "{field} must be positive and finite, got {value}"
                )));
            }
        }
        if !self.rate.is_finite() || !self.cost_of_carry.is_finite() {
            return Err(EngineError::NumericalDomain(format!(
                "rate {} / cost of carry {} must be finite",
                self.rate, self.cost_of_carry
            )));
        }
        Ok(())
    }
}

// ── Model selection ──

/// Model-name tag carried by a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum ModelKind {
    #[serde(rename = "black-scholes")]
    BlackScholes,
    #[serde(rename = "binomial")]
    Binomial,
    #[serde(rename = "monte-carlo")]
    MonteCarlo,
}

impl FromStr for ModelKind {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "black-scholes" => Ok(Self::BlackScholes),
            "binomial" => Ok(Self::Binomial),
            "monte-carlo" => Ok(Self::MonteCarlo),
            other => Err(EngineError::InvalidInput(format!(
                "unsupported pricing model '{other}' (expected black-scholes|binomial|monte-carlo)"
            ))),
        }
    }
}

/// Tagged union over the three models. The variants share a call
/// signature and nothing else.
#[derive(Debug, Clone)]
pub enum Pricer {
    BlackScholes(BlackScholes),
    Binomial(BinomialTree),
    MonteCarlo(MonteCarlo),
}

impl Pricer {
    pub fn for_kind(kind: ModelKind, config: &PricingConfig) -> EngineResult<Self> {
        Ok(match kind {
            ModelKind::BlackScholes => Self::BlackScholes(BlackScholes),
            ModelKind::Binomial => {
                Self::Binomial(BinomialTree::new(config.binomial_steps, config.binomial_style)?)
            }
            ModelKind::MonteCarlo => Self::MonteCarlo(
                MonteCarlo::new(config.mc_paths, config.mc_steps, config.mc_style)?
                    .with_seed(config.mc_seed),
            ),
        })
    }

    pub fn kind(&self) -> ModelKind {
        match self {
            Self::BlackScholes(_) => ModelKind::BlackScholes,
            Self::Binomial(_) => ModelKind::Binomial,
            Self::MonteCarlo(_) => ModelKind::MonteCarlo,
        }
    }
}

impl PricingModel for Pricer {
    fn name(&self) -> &'static str {
        match self {
            Self::BlackScholes(m) => m.name(),
            Self::Binomial(m) => m.name(),
            Self::MonteCarlo(m) => m.name(),
        }
    }

    #[inline]
    fn price(&self, params: &PricingParams) -> EngineResult<f64> {
        match self {
            Self::BlackScholes(m) => m.price(params),
            Self::Binomial(m) => m.price(params),
            Self::MonteCarlo(m) => m.price(params),
        }
    }
}
