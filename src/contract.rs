use crate::errors::{EngineError, EngineResult};
use chrono::NaiveDate;
use std::str::FromStr;

/// Calendar days per year used for every days -> years conversion.
pub const DAYS_PER_YEAR: f64 = 365.25;

/// Shares per listed equity option contract.
pub const CONTRACT_MULTIPLIER: f64 = 100.0;

/// Longest horizon accepted, in calendar days. Listed equity options
/// (LEAPS included) expire within three years; the time axis has one
/// column per day.
pub const MAX_DAYS_TO_EXPIRY: i64 = 1_100;

const EXPIRY_FORMAT: &str = "%Y-%m-%d";

#[inline]
pub fn days_to_years(days: f64) -> f64 {
    days / DAYS_PER_YEAR
}

// ── Option type ──

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionType {
    Call,
    Put,
}

impl OptionType {
    /// Intrinsic value of one share at the given underlying price.
    #[inline]
    pub fn payoff(self, spot: f64, strike: f64) -> f64 {
        match self {
            Self::Call => (spot - strike).max(0.0),
            Self::Put => (strike - spot).max(0.0),
        }
    }
}

impl FromStr for OptionType {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "call" => Ok(Self::Call),
            "put" => Ok(Self::Put),
            other => Err(EngineError::InvalidInput(format!(
                "unrecognized option type '{other}' (expected call|put)"
            ))),
        }
    }
}

impl std::fmt::Display for OptionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Call => write!(f, "call"),
            Self::Put => write!(f, "put"),
        }
    }
}

// ── Exercise style (lattice) ──

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExerciseStyle {
    European,
    American,
}

impl FromStr for ExerciseStyle {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "european" => Ok(Self::European),
            "american" => Ok(Self::American),
            other => Err(EngineError::Config(format!(
                "unrecognized exercise style '{other}' (expected european|american)"
            ))),
        }
    }
}

// ── Payoff style (simulation) ──

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulationStyle {
    /// Terminal price only.
    European,
    /// Arithmetic mean of the whole path.
    Asian,
}

impl FromStr for SimulationStyle {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "european" => Ok(Self::European),
            "asian" => Ok(Self::Asian),
            other => Err(EngineError::SimulationConfig(format!(
                "unsupported simulation style '{other}' (expected european|asian)"
            ))),
        }
    }
}

// ── Contract under analysis ──

/// Immutable description of the single long option position being analysed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OptionSpec {
    pub strike: f64,
    pub option_type: OptionType,
    /// Price paid per share.
    pub premium: f64,
    pub expiry: NaiveDate,
}

impl OptionSpec {
    pub fn new(
        strike: f64,
        premium: f64,
        option_type: OptionType,
        expiry: NaiveDate,
    ) -> EngineResult<Self> {
        if !strike.is_finite() || strike <= 0.0 {
            return Err(EngineError::InvalidInput(format!(
                "strike must be positive, got {strike}"
            )));
        }
        if !premium.is_finite() || premium <= 0.0 {
            return Err(EngineError::InvalidInput(format!(
                "premium must be positive, got {premium}"
            )));
        }
        Ok(Self {
            strike,
            option_type,
            premium,
            expiry,
        })
    }

    /// Build from raw request fields (`expiry` as `YYYY-MM-DD`).
    pub fn parse(strike: f64, premium: f64, option_type: &str, expiry: &str) -> EngineResult<Self> {
        let option_type: OptionType = option_type.parse()?;
        let expiry = NaiveDate::parse_from_str(expiry.trim(), EXPIRY_FORMAT).map_err(|e| {
            EngineError::InvalidInput(format!("expiry '{expiry}' is not YYYY-MM-DD: {e}"))
        })?;
        Self::new(strike, premium, option_type, expiry)
    }

    /// Whole calendar days from `today` to expiry. Fails when the contract
    /// has no remaining life.
    pub fn days_to_expiry(&self, today: NaiveDate) -> EngineResult<u32> {
        let days = (self.expiry - today).num_days();
        if days <= 0 {
            return Err(EngineError::ExpiredContract {
                expiry: self.expiry,
                days,
            });
        }
        if days > MAX_DAYS_TO_EXPIRY {
            return Err(EngineError::InvalidInput(format!(
                "expiry {} is {days} days out (max {MAX_DAYS_TO_EXPIRY})",
                self.expiry
            )));
        }
        u32::try_from(days)
            .map_err(|_| EngineError::InvalidInput(format!("expiry {} is too far out", self.expiry)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_valid_request() {
        let spec = OptionSpec::parse(150.0, 4.25, "Put", "2026-12-18").unwrap();
        assert_eq!(spec.option_type, OptionType::Put);
        assert_eq!(spec.expiry, date(2026, 12, 18));
    }

    #[test]
    fn test_rejects_bad_fields() {
        assert!(matches!(
            OptionSpec::parse(0.0, 1.0, "call", "2026-12-18"),
            Err(EngineError::InvalidInput(_))
        ));
        assert!(matches!(
            OptionSpec::parse(100.0, -1.0, "call", "2026-12-18"),
            Err(EngineError::InvalidInput(_))
        ));
        assert!(matches!(
            OptionSpec::parse(100.0, 1.0, "straddle", "2026-12-18"),
            Err(EngineError::InvalidInput(_))
        ));
        assert!(matches!(
            OptionSpec::parse(100.0, 1.0, "call", "18/12/2026"),
            Err(EngineError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_expired_contract() {
        let spec = OptionSpec::parse(100.0, 2.0, "call", "2020-01-01").unwrap();
        let err = spec.days_to_expiry(date(2026, 10, 16)).unwrap_err();
        assert!(matches!(err, EngineError::ExpiredContract { .. }), "got {err}");
    }

    #[test]
    fn test_expiring_today_is_expired() {
        let spec = OptionSpec::parse(100.0, 2.0, "call", "2026-10-16").unwrap();
        assert!(spec.days_to_expiry(date(2026, 10, 16)).is_err());
        assert_eq!(spec.days_to_expiry(date(2026, 10, 15)).unwrap(), 1);
    }

    #[test]
    fn test_far_expiry_rejected() {
        let today = date(2026, 10, 16);
        let far = OptionSpec::parse(100.0, 2.0, "call", "9999-12-31").unwrap();
        assert!(matches!(far.days_to_expiry(today), Err(EngineError::InvalidInput(_))));

        let edge = today + chrono::Duration::days(MAX_DAYS_TO_EXPIRY);
        let spec = OptionSpec::new(100.0, 2.0, OptionType::Call, edge).unwrap();
        assert_eq!(spec.days_to_expiry(today).unwrap(), MAX_DAYS_TO_EXPIRY as u32);

        let spec = OptionSpec::new(100.0, 2.0, OptionType::Call, edge.succ_opt().unwrap()).unwrap();
        assert!(matches!(spec.days_to_expiry(today), Err(EngineError::InvalidInput(_))));
    }

    #[test]
    fn test_payoff() {
        assert_eq!(OptionType::Call.payoff(110.0, 100.0), 10.0);
        assert_eq!(OptionType::Call.payoff(90.0, 100.0), 0.0);
        assert_eq!(OptionType::Put.payoff(90.0, 100.0), 10.0);
    }

    #[test]
    fn test_simulation_style_rejects_unknown() {
        let err = "bermudan".parse::<SimulationStyle>().unwrap_err();
        assert!(matches!(err, EngineError::SimulationConfig(_)));
    }
}
