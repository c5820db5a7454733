pub mod fixture;

use crate::contract::{OptionSpec, OptionType};
use crate::errors::{EngineError, EngineResult};
use crate::models::volatility;
use chrono::NaiveDate;

/// Source of market state the engine prices against.
/// Calls are blocking and made once per request, before any grid work.
pub trait MarketDataProvider: Send + Sync {
    fn name(&self) -> &'static str;

    /// Latest underlying price. Fails with DataUnavailable if there is no quote.
    fn spot_price(&self, ticker: &str) -> EngineResult<f64>;

    /// Chain implied volatility for the exact (expiry, strike, type).
    /// Any failure here sends the caller to the historical estimate.
    fn implied_volatility(
        &self,
        ticker: &str,
        expiry: NaiveDate,
        strike: f64,
        option_type: OptionType,
    ) -> EngineResult<f64>;

    /// Annualized std-dev of daily log returns over the trailing `lookback` closes.
    fn historical_volatility(&self, ticker: &str, lookback: usize) -> EngineResult<f64>;

    /// Every listed contract for the ticker, in no particular order.
    fn option_chain(&self, ticker: &str) -> EngineResult<Vec<ChainContract>>;
}

/// One listed contract.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ChainContract {
    #[serde(rename = "type")]
    pub option_type: OptionType,
    pub strike: f64,
    /// Last traded price per share.
    pub premium: f64,
    pub expiry: NaiveDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VolatilitySource {
    Implied,
    Historical,
}

/// Market state needed to price one request. Built once, never mutated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarketSnapshot {
    pub spot_price: f64,
    pub volatility: f64,
    pub volatility_source: VolatilitySource,
    pub risk_free_rate: f64,
    pub as_of: NaiveDate,
}

/// Fetch spot and volatility for `spec`, preferring the chain's implied
/// volatility and falling back to the historical estimate.
pub fn resolve_snapshot(
    provider: &dyn MarketDataProvider,
    ticker: &str,
    spec: &OptionSpec,
    risk_free_rate: f64,
    lookback: usize,
    today: NaiveDate,
) -> EngineResult<MarketSnapshot> {
    let spot_price = provider.spot_price(ticker)?;
    if !spot_price.is_finite() || spot_price <= 0.0 {
        return Err(EngineError::DataUnavailable(format!(
            "{} returned non-positive spot {spot_price} for {ticker}",
            provider.name()
        )));
    }

    let implied = provider.implied_volatility(ticker, spec.expiry, spec.strike, spec.option_type);
    let (volatility, volatility_source) = match implied {
        Ok(iv) if volatility::is_usable(iv) => (iv, VolatilitySource::Implied),
        other => {
            let reason = match other {
                Ok(iv) => format!("unusable implied volatility {iv}"),
                Err(e) => e.to_string(),
            };
            tracing::warn!(
                ticker = %ticker,
                strike = spec.strike,
                expiry = %spec.expiry,
                reason = %reason,
                "implied volatility unavailable, using historical estimate"
            );
            let hv = provider.historical_volatility(ticker, lookback)?;
            if !volatility::is_usable(hv) {
                return Err(EngineError::DataUnavailable(format!(
                    "no usable volatility estimate for {ticker}"
                )));
            }
            (hv, VolatilitySource::Historical)
        }
    };

    tracing::debug!(
        ticker = %ticker,
        spot = spot_price,
        sigma = volatility,
        source = ?volatility_source,
        "market snapshot resolved"
    );

    Ok(MarketSnapshot {
        spot_price,
        volatility,
        volatility_source,
        risk_free_rate,
        as_of: today,
    })
}

/// Contracts from the nearest `max_expiries` expiries, calls before puts,
/// strikes ascending.
pub fn list_contracts(
    provider: &dyn MarketDataProvider,
    ticker: &str,
    max_expiries: usize,
) -> EngineResult<Vec<ChainContract>> {
    let mut chain = provider.option_chain(ticker)?;
    if chain.is_empty() {
        return Err(EngineError::DataUnavailable(format!("no options found for {ticker}")));
    }

    let mut expiries: Vec<NaiveDate> = chain.iter().map(|c| c.expiry).collect();
    expiries.sort_unstable();
    expiries.dedup();
    expiries.truncate(max_expiries);

    chain.retain(|c| expiries.contains(&c.expiry));
    chain.sort_by(|a, b| {
        a.expiry
            .cmp(&b.expiry)
            .then_with(|| (a.option_type == OptionType::Put).cmp(&(b.option_type == OptionType::Put)))
            .then_with(|| a.strike.total_cmp(&b.strike))
    });
    Ok(chain)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fixture::FixtureProvider;

    const FIXTURE: &str = r#"{
        "tickers": {
            "ACME": {
                "spot": 100.0,
                "closes": [100.0, 101.0, 100.0, 101.0, 100.0],
                "chain": [
                    {"expiry": "2026-12-18", "strike": 100.0, "type": "call", "implied_volatility": 0.3, "last_price": 4.0},
                    {"expiry": "2026-12-18", "strike": 100.0, "type": "put", "implied_volatility": 0.0, "last_price": 3.5},
                    {"expiry": "2026-11-20", "strike": 95.0, "type": "put", "last_price": 1.2},
                    {"expiry": "2026-11-20", "strike": 105.0, "type": "call", "last_price": 0.9},
                    {"expiry": "2027-01-15", "strike": 100.0, "type": "call", "last_price": 6.0},
                    {"expiry": "2027-03-19", "strike": 100.0, "type": "call", "last_price": 8.0}
                ]
            },
            "FLAT": { "spot": 50.0, "closes": [50.0, 50.0, 50.0], "chain": [] }
        }
    }"#;

    fn provider() -> FixtureProvider {
        FixtureProvider::from_json(FIXTURE).unwrap()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    #[test]
    fn test_prefers_implied_volatility() {
        let spec = OptionSpec::parse(100.0, 4.0, "call", "2026-12-18").unwrap();
        let snap = resolve_snapshot(&provider(), "ACME", &spec, 0.045, 252, today()).unwrap();
        assert_eq!(snap.volatility_source, VolatilitySource::Implied);
        assert!((snap.volatility - 0.3).abs() < 1e-12);
        assert_eq!(snap.spot_price, 100.0);
    }

    #[test]
    fn test_falls_back_when_strike_missing() {
        let spec = OptionSpec::parse(110.0, 1.0, "call", "2026-12-18").unwrap();
        let snap = resolve_snapshot(&provider(), "ACME", &spec, 0.045, 252, today()).unwrap();
        assert_eq!(snap.volatility_source, VolatilitySource::Historical);
        let expected = (101.0_f64 / 100.0).ln() * 252.0_f64.sqrt();
        assert!((snap.volatility - expected).abs() < 1e-12, "hv={}", snap.volatility);
    }

    #[test]
    fn test_falls_back_on_zero_implied() {
        let spec = OptionSpec::parse(100.0, 3.5, "put", "2026-12-18").unwrap();
        let snap = resolve_snapshot(&provider(), "ACME", &spec, 0.045, 252, today()).unwrap();
        assert_eq!(snap.volatility_source, VolatilitySource::Historical);
    }

    #[test]
    fn test_no_volatility_is_data_unavailable() {
        let spec = OptionSpec::parse(50.0, 1.0, "call", "2026-12-18").unwrap();
        let err = resolve_snapshot(&provider(), "FLAT", &spec, 0.045, 252, today()).unwrap_err();
        assert!(matches!(err, EngineError::DataUnavailable(_)), "got {err}");
    }

    #[test]
    fn test_unknown_ticker() {
        let spec = OptionSpec::parse(50.0, 1.0, "call", "2026-12-18").unwrap();
        let err = resolve_snapshot(&provider(), "NOPE", &spec, 0.045, 252, today()).unwrap_err();
        assert!(matches!(err, EngineError::DataUnavailable(_)));
    }

    #[test]
    fn test_list_contracts_first_three_expiries() {
        let contracts = list_contracts(&provider(), "ACME", 3).unwrap();
        assert_eq!(contracts.len(), 5, "2027-03-19 is the fourth expiry");
        assert_eq!(contracts[0].expiry, NaiveDate::from_ymd_opt(2026, 11, 20).unwrap());
        assert_eq!(contracts[0].option_type, OptionType::Call);
        assert_eq!(contracts[1].option_type, OptionType::Put);
        assert!(list_contracts(&provider(), "FLAT", 3).is_err());
    }

    #[test]
    fn test_contract_payload_keys() {
        let contracts = list_contracts(&provider(), "ACME", 1).unwrap();
        let v = serde_json::to_value(&contracts[0]).unwrap();
        let mut keys: Vec<&str> = v.as_object().unwrap().keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, ["expiry", "premium", "strike", "type"]);
        assert_eq!(v["expiry"], "2026-11-20");
    }
}
