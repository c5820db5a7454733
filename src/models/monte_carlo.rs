use crate::contract::SimulationStyle;
use crate::errors::{EngineError, EngineResult};
use crate::models::{PricingModel, PricingParams};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use rayon::prelude::*;

/// Default number of simulated paths.
pub const DEFAULT_PATHS: usize = 100_000;

/// Default number of time steps per path.
pub const DEFAULT_STEPS: usize = 100;

/// Paths per rayon task. Each chunk owns an independently seeded RNG.
const CHUNK_PATHS: usize = 4_096;

/// Monte Carlo valuation under geometric Brownian motion.
///
/// S_{t+dt} = S_t * exp((b - sigma^2/2)*dt + sigma*sqrt(dt)*Z),  Z ~ N(0,1)
///
/// European payoff uses S_T; Asian payoff uses the arithmetic mean of the
/// path including S_0. Price = e^{-rT} * mean(payoff). The result is an
/// estimator: its standard error shrinks as 1/sqrt(paths).
#[derive(Debug, Clone)]
pub struct MonteCarlo {
    pub paths: usize,
    pub steps: usize,
    pub style: SimulationStyle,
    /// Base seed. `None` draws fresh entropy on every valuation.
    pub seed: Option<u64>,
}

/// Price estimate with its sampling error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct McEstimate {
    pub price: f64,
    pub std_error: f64,
    pub paths: usize,
}

impl MonteCarlo {
    pub fn new(paths: usize, steps: usize, style: SimulationStyle) -> EngineResult<Self> {
        if paths == 0 {
            return Err(EngineError::SimulationConfig("path count must be >= 1".into()));
        }
        if steps == 0 {
            return Err(EngineError::SimulationConfig("time steps must be >= 1".into()));
        }
        Ok(Self {
            paths,
            steps,
            style,
            seed: None,
        })
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Simulate and return price plus standard error.
    /// Chunks are reduced in index order, so a fixed seed is reproducible
    /// regardless of how rayon schedules them.
    pub fn estimate(&self, params: &PricingParams) -> EngineResult<McEstimate> {
        params.validate()?;

        let dt = params.ttl_years / self.steps as f64;
        let drift = (params.cost_of_carry - 0.5 * params.sigma * params.sigma) * dt;
        let diffusion = params.sigma * dt.sqrt();
        let base_seed = self.seed.unwrap_or_else(rand::random);

        let n_chunks = self.paths.div_ceil(CHUNK_PATHS);
        let partials: Vec<(f64, f64)> = (0..n_chunks)
            .into_par_iter()
            .map(|chunk| {
                let start = chunk * CHUNK_PATHS;
                let n = CHUNK_PATHS.min(self.paths - start);
                let seed = base_seed.wrapping_add((chunk as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15));
                self.simulate_chunk(params, drift, diffusion, n, seed)
            })
            .collect();

        let (sum, sum_sq) = partials
            .iter()
            .fold((0.0, 0.0), |(s, sq), &(cs, csq)| (s + cs, sq + csq));

        let n = self.paths as f64;
        let mean = sum / n;
        let variance = if self.paths > 1 {
            ((sum_sq - n * mean * mean) / (n - 1.0)).max(0.0)
        } else {
            0.0
        };
        let disc = (-params.rate * params.ttl_years).exp();

        Ok(McEstimate {
            price: disc * mean,
            std_error: disc * (variance / n).sqrt(),
            paths: self.paths,
        })
    }

    /// Sum and sum of squares of undiscounted payoffs over `n` paths.
    fn simulate_chunk(
        &self,
        params: &PricingParams,
        drift: f64,
        diffusion: f64,
        n: usize,
        seed: u64,
    ) -> (f64, f64) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut sum = 0.0;
        let mut sum_sq = 0.0;
        let points = (self.steps + 1) as f64;

        for _ in 0..n {
            let mut s = params.spot;
            let mut path_sum = s;
            for _ in 0..self.steps {
                let z: f64 = rng.sample(StandardNormal);
                s *= (drift + diffusion * z).exp();
                path_sum += s;
            }
            let reference = match self.style {
                SimulationStyle::European => s,
                SimulationStyle::Asian => path_sum / points,
            };
            let payoff = params.option_type.payoff(reference, params.strike);
            sum += payoff;
            sum_sq += payoff * payoff;
        }

        (sum, sum_sq)
    }
}

impl PricingModel for MonteCarlo {
    #[inline]
    fn name(&self) -> &'static str {
        "Monte-Carlo"
    }

    fn price(&self, params: &PricingParams) -> EngineResult<f64> {
        self.estimate(params).map(|e| e.price)
    }
}
