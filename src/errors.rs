/// Domain-specific error types for the pricing engine.
/// Every failure surfaced to a caller carries one of these kinds so the
/// client can tell a bad request from missing market data or a numerical
/// problem. Nothing here is retried internally.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("contract expired: {expiry} is {days} day(s) from today")]
    ExpiredContract { expiry: chrono::NaiveDate, days: i64 },

    #[error("market data unavailable: {0}")]
    DataUnavailable(String),

    #[error("numerical domain violation: {0}")]
    NumericalDomain(String),

    #[error("simulation config error: {0}")]
    SimulationConfig(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("io error: {0}")]
    Io(String),
}

impl EngineError {
    /// Stable tag for structured error payloads.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::ExpiredContract { .. } => "expired_contract",
            Self::DataUnavailable(_) => "data_unavailable",
            Self::NumericalDomain(_) => "numerical_domain",
            Self::SimulationConfig(_) => "simulation_config",
            Self::Config(_) => "config",
            Self::Parse(_) => "parse",
            Self::Io(_) => "io",
        }
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(e: serde_json::Error) -> Self {
        EngineError::Parse(e.to_string())
    }
}

impl From<std::io::Error> for EngineError {
    fn from(e: std::io::Error) -> Self {
        EngineError::Io(e.to_string())
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
