use crate::contract::{ExerciseStyle, SimulationStyle};
use crate::errors::{EngineError, EngineResult};
use crate::models::{binomial, monte_carlo, volatility};
use std::path::PathBuf;
use std::str::FromStr;

/// Engine-side settings. Everything a valuation needs besides the request
/// and the market snapshot.
#[derive(Debug, Clone)]
pub struct PricingConfig {
    /// Annualized risk-free rate; cost of carry is taken equal to it.
    pub risk_free_rate: f64,
    pub binomial_steps: usize,
    pub binomial_style: ExerciseStyle,
    pub mc_paths: usize,
    pub mc_steps: usize,
    pub mc_style: SimulationStyle,
    pub mc_seed: Option<u64>,
    /// Trailing closes used by the historical volatility fallback.
    pub vol_lookback: usize,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            risk_free_rate: 0.045,
            binomial_steps: binomial::DEFAULT_STEPS,
            binomial_style: ExerciseStyle::American,
            mc_paths: monte_carlo::DEFAULT_PATHS,
            mc_steps: monte_carlo::DEFAULT_STEPS,
            mc_style: SimulationStyle::European,
            mc_seed: None,
            vol_lookback: volatility::DEFAULT_LOOKBACK,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub pricing: PricingConfig,
    pub market_data_path: PathBuf,
    pub cors_origin: String,
    pub server_port: u16,
}

impl AppConfig {
    pub fn from_env() -> EngineResult<Self> {
        dotenvy::dotenv().ok();

        let defaults = PricingConfig::default();

        let risk_free_rate: f64 = parse_var("RISK_FREE_RATE", "0.045")?;
        if !risk_free_rate.is_finite() {
            return Err(EngineError::Config(format!(
                "RISK_FREE_RATE must be finite, got {risk_free_rate}"
            )));
        }

        let binomial_steps: usize = parse_var("BINOMIAL_STEPS", &defaults.binomial_steps.to_string())?;
        if binomial_steps == 0 {
            return Err(EngineError::Config("BINOMIAL_STEPS must be >= 1".into()));
        }

        // Bad styles keep their own error kind (simulation style -> SimulationConfig).
        let binomial_style = ExerciseStyle::from_str(&env_var_or("BINOMIAL_STYLE", "american"))?;
        let mc_style = SimulationStyle::from_str(&env_var_or("MC_STYLE", "european"))?;

        let mc_paths: usize = parse_var("MC_PATHS", &defaults.mc_paths.to_string())?;
        let mc_steps: usize = parse_var("MC_STEPS", &defaults.mc_steps.to_string())?;
        if mc_paths == 0 || mc_steps == 0 {
            return Err(EngineError::SimulationConfig(
                "MC_PATHS and MC_STEPS must be >= 1".into(),
            ));
        }

        let mc_seed = match std::env::var("MC_SEED") {
            Ok(s) if !s.trim().is_empty() => Some(
                s.trim()
                    .parse::<u64>()
                    .map_err(|e| EngineError::Config(format!("MC_SEED: {e}")))?,
            ),
            _ => None,
        };

        let vol_lookback: usize = parse_var("VOL_LOOKBACK_DAYS", &defaults.vol_lookback.to_string())?;
        if vol_lookback < 2 {
            return Err(EngineError::Config("VOL_LOOKBACK_DAYS must be >= 2".into()));
        }

        let server_port: u16 = parse_var("SERVER_PORT", "8000")?;

        Ok(Self {
            pricing: PricingConfig {
                risk_free_rate,
                binomial_steps,
                binomial_style,
                mc_paths,
                mc_steps,
                mc_style,
                mc_seed,
                vol_lookback,
            },
            market_data_path: PathBuf::from(env_var_or("MARKET_DATA_PATH", "data/market.json")),
            cors_origin: env_var_or("CORS_ORIGIN", "http://localhost:3000"),
            server_port,
        })
    }
}

fn parse_var<T>(key: &str, default: &str) -> EngineResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    env_var_or(key, default)
        .trim()
        .parse::<T>()
        .map_err(|e| EngineError::Config(format!("{key}: {e}")))
}

fn env_var_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
