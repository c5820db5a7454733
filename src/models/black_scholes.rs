use crate::contract::OptionType;
use crate::errors::EngineResult;
use crate::models::normal::norm_cdf;
use crate::models::{PricingModel, PricingParams};

/// Closed-form Black-Scholes(-Merton) valuation with cost of carry.
///
/// Call = S * e^{(b-r)T} * Phi(d1) - K * e^{-rT} * Phi(d2)
/// Put  = K * e^{-rT} * Phi(-d2) - S * e^{(b-r)T} * Phi(-d1)
///
/// where d1 = (ln(S/K) + (b + sigma^2/2)*T) / (sigma * sqrt(T))
/// and d2 = d1 - sigma * sqrt(T). With b = r this is the textbook formula.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlackScholes;

/// d1 and d2 for validated params.
#[inline]
pub fn d1_d2(params: &PricingParams) -> (f64, f64) {
    let sigma_sqrt_t = params.sigma * params.ttl_years.sqrt();
    let d1 = ((params.spot / params.strike).ln()
        + (params.cost_of_carry + 0.5 * params.sigma * params.sigma) * params.ttl_years)
        / sigma_sqrt_t;
    (d1, d1 - sigma_sqrt_t)
}

/// Carry factor e^{(b-r)T} applied to the spot leg.
#[inline]
pub fn carry_factor(params: &PricingParams) -> f64 {
    ((params.cost_of_carry - params.rate) * params.ttl_years).exp()
}

impl PricingModel for BlackScholes {
    #[inline]
    fn name(&self) -> &'static str {
        "Black-Scholes"
    }

    fn price(&self, params: &PricingParams) -> EngineResult<f64> {
        params.validate()?;

        let (d1, d2) = d1_d2(params);
        let spot_leg = params.spot * carry_factor(params);
        let strike_leg = params.strike * (-params.rate * params.ttl_years).exp();

        Ok(match params.option_type {
            OptionType::Call => spot_leg * norm_cdf(d1) - strike_leg * norm_cdf(d2),
            OptionType::Put => strike_leg * norm_cdf(-d2) - spot_leg * norm_cdf(-d1),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::EngineError;

    fn params(option_type: OptionType) -> PricingParams {
        PricingParams::new(100.0, 100.0, 0.5, 0.05, 0.2, option_type)
    }

    #[test]
    fn test_reference_call_price() {
        let c = BlackScholes.price(&params(OptionType::Call)).unwrap();
        assert!((c - 6.89).abs() < 0.05, "ATM call={c} should be ~6.89");
    }

    #[test]
    fn test_textbook_one_year_call() {
        let p = PricingParams::new(100.0, 100.0, 1.0, 0.05, 0.2, OptionType::Call);
        let c = BlackScholes.price(&p).unwrap();
        assert!((c - 10.4506).abs() < 1e-3, "1y ATM call={c}");
    }

    #[test]
    fn test_put_call_parity() {
        let cases = [
            (100.0, 100.0, 0.5, 0.05, 0.05, 0.2),
            (80.0, 100.0, 1.5, 0.03, 0.01, 0.35),
            (130.0, 95.0, 0.1, 0.045, 0.045, 0.6),
            (42.0, 40.0, 2.0, 0.0, -0.02, 0.15),
        ];
        for (s, k, t, r, b, sigma) in cases {
            let call = PricingParams::new(s, k, t, r, sigma, OptionType::Call).with_carry(b);
            let put = PricingParams { option_type: OptionType::Put, ..call };
            let c = BlackScholes.price(&call).unwrap();
            let p = BlackScholes.price(&put).unwrap();
            let rhs = s * ((b - r) * t).exp() - k * (-r * t).exp();
            assert!(
                (c - p - rhs).abs() < 1e-9,
                "parity broken for S={s} K={k}: C-P={} rhs={rhs}",
                c - p
            );
        }
    }

    #[test]
    fn test_tiny_time_collapses_to_intrinsic() {
        let t = 1.0 / 3_652_500.0;
        let itm = PricingParams::new(110.0, 100.0, t, 0.05, 0.2, OptionType::Call);
        let otm = PricingParams::new(90.0, 100.0, t, 0.05, 0.2, OptionType::Call);
        let v_itm = BlackScholes.price(&itm).unwrap();
        let v_otm = BlackScholes.price(&otm).unwrap();
        assert!((v_itm - 10.0).abs() < 1e-3, "ITM at expiry={v_itm}");
        assert!(v_otm.abs() < 1e-9, "OTM at expiry={v_otm}");
    }

    #[test]
    fn test_domain_errors_instead_of_nan() {
        let zero_vol = PricingParams { sigma: 0.0, ..params(OptionType::Call) };
        assert!(matches!(
            BlackScholes.price(&zero_vol),
            Err(EngineError::NumericalDomain(_))
        ));
        let neg_spot = params(OptionType::Put).at(-5.0, 0.5);
        assert!(BlackScholes.price(&neg_spot).is_err());
        let zero_t = params(OptionType::Put).at(100.0, 0.0);
        assert!(BlackScholes.price(&zero_t).is_err());
    }
}
