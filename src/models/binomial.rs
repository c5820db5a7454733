use crate::contract::ExerciseStyle;
use crate::errors::{EngineError, EngineResult};
use crate::models::{PricingModel, PricingParams};

/// Default lattice depth.
pub const DEFAULT_STEPS: usize = 100;

/// Cox-Ross-Rubinstein recombining binomial lattice.
///
/// dt = T/N, u = e^{sigma*sqrt(dt)}, d = 1/u,
/// q = (e^{b*dt} - d) / (u - d), per-step discount e^{-r*dt}.
///
/// Terminal payoffs are rolled back one step at a time; for American style
/// every node takes the larger of continuation and immediate exercise.
/// European prices converge to Black-Scholes as N grows, at O(N^2) work and
/// O(N) memory.
#[derive(Debug, Clone)]
pub struct BinomialTree {
    pub steps: usize,
    pub style: ExerciseStyle,
}

impl BinomialTree {
    pub fn new(steps: usize, style: ExerciseStyle) -> EngineResult<Self> {
        if steps == 0 {
            return Err(EngineError::Config("binomial steps must be >= 1".into()));
        }
        Ok(Self { steps, style })
    }
}

impl PricingModel for BinomialTree {
    #[inline]
    fn name(&self) -> &'static str {
        "Binomial"
    }

    fn price(&self, params: &PricingParams) -> EngineResult<f64> {
        params.validate()?;

        let n = self.steps;
        let dt = params.ttl_years / n as f64;
        let u = (params.sigma * dt.sqrt()).exp();
        let d = 1.0 / u;
        let q = ((params.cost_of_carry * dt).exp() - d) / (u - d);
        if !q.is_finite() || !(0.0..=1.0).contains(&q) {
            return Err(EngineError::NumericalDomain(format!(
                "risk-neutral probability {q} outside [0, 1]; increase steps or volatility"
            )));
        }
        let disc = (-params.rate * dt).exp();
        let disc_up = disc * q;
        let disc_down = disc * (1.0 - q);

        // spot * u^j * d^(n-j) = spot * d^n * (u/d)^j
        let ratio = u / d;
        let mut values = Vec::with_capacity(n + 1);
        let mut st = params.spot * d.powi(n as i32);
        for _ in 0..=n {
            values.push(params.option_type.payoff(st, params.strike));
            st *= ratio;
        }

        let early_exercise = self.style == ExerciseStyle::American;
        // Lowest node price at step i is spot * d^i.
        let mut base = params.spot * d.powi(n as i32 - 1);
        for i in (0..n).rev() {
            if early_exercise {
                let mut st = base;
                for j in 0..=i {
                    let continuation = disc_up * values[j + 1] + disc_down * values[j];
                    values[j] = continuation.max(params.option_type.payoff(st, params.strike));
                    st *= ratio;
                }
            } else {
                for j in 0..=i {
                    values[j] = disc_up * values[j + 1] + disc_down * values[j];
                }
            }
            base *= u;
        }

        Ok(values[0])
    }
}
