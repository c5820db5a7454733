use crate::contract::OptionType;
use crate::errors::EngineResult;
use crate::models::black_scholes::{carry_factor, d1_d2};
use crate::models::normal::{norm_cdf, norm_pdf};
use crate::models::PricingParams;

/// Closed-form sensitivities of the Black-Scholes-Merton price.
///
/// Reported in market convention: theta per calendar day, vega and rho per
/// one percentage point move.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct Greeks {
    pub delta: f64,
    pub gamma: f64,
    pub theta: f64,
    pub vega: f64,
    pub rho: f64,
}

impl Greeks {
    pub fn compute(params: &PricingParams) -> EngineResult<Self> {
        params.validate()?;

        let s = params.spot;
        let k = params.strike;
        let t = params.ttl_years;
        let r = params.rate;
        let b = params.cost_of_carry;
        let sigma = params.sigma;
        let sqrt_t = t.sqrt();

        let (d1, d2) = d1_d2(params);
        let cf = carry_factor(params);
        let df = (-r * t).exp();
        let pdf_d1 = norm_pdf(d1);

        let gamma = cf * pdf_d1 / (s * sigma * sqrt_t);
        let vega = s * cf * pdf_d1 * sqrt_t;
        let decay = -s * cf * pdf_d1 * sigma / (2.0 * sqrt_t);

        let (delta, theta, rho) = match params.option_type {
            OptionType::Call => (
                cf * norm_cdf(d1),
                decay - (b - r) * s * cf * norm_cdf(d1) - r * k * df * norm_cdf(d2),
                t * k * df * norm_cdf(d2),
            ),
            OptionType::Put => (
                cf * (norm_cdf(d1) - 1.0),
                decay + (b - r) * s * cf * norm_cdf(-d1) + r * k * df * norm_cdf(-d2),
                -t * k * df * norm_cdf(-d2),
            ),
        };

        Ok(Self {
            delta,
            gamma,
            theta: theta / 365.0,
            vega: vega / 100.0,
            rho: rho / 100.0,
        })
    }
}
