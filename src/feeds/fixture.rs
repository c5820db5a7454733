use super::{ChainContract, MarketDataProvider};
use crate::contract::OptionType;
use crate::errors::{EngineError, EngineResult};
use crate::models::volatility;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::path::Path;

/// Market data served from a JSON file. Stands in for a live quote/chain
/// vendor; the engine only sees the `MarketDataProvider` contract.
///
/// File format:
/// {
///   "tickers": {
///     "AAPL": {
///       "spot": 227.5,                     // optional, defaults to last close
///       "closes": [221.0, 223.4, ...],     // daily closes, oldest first
///       "chain": [
///         { "expiry": "2026-11-20", "strike": 230.0, "type": "call",
///           "implied_volatility": 0.27, "last_price": 5.15 }
///       ]
///     }
///   }
/// }
#[derive(Debug, Clone)]
pub struct FixtureProvider {
    tickers: HashMap<String, TickerData>,
}

#[derive(serde::Deserialize)]
struct FixtureFile {
    tickers: HashMap<String, TickerData>,
}

#[derive(Debug, Clone, serde::Deserialize)]
struct TickerData {
    spot: Option<f64>,
    #[serde(default)]
    closes: Vec<f64>,
    #[serde(default)]
    chain: Vec<FixtureContract>,
}

#[derive(Debug, Clone, serde::Deserialize)]
struct FixtureContract {
    expiry: NaiveDate,
    strike: f64,
    #[serde(rename = "type")]
    option_type: OptionType,
    implied_volatility: Option<f64>,
    last_price: f64,
}

impl FixtureProvider {
    pub fn load(path: &Path) -> EngineResult<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| EngineError::Io(format!("{}: {e}", path.display())))?;
        let provider = Self::from_json(&raw)?;
        tracing::info!(
            path = %path.display(),
            tickers = provider.tickers.len(),
            "market data fixture loaded"
        );
        Ok(provider)
    }

    pub fn from_json(raw: &str) -> EngineResult<Self> {
        let file: FixtureFile = serde_json::from_str(raw)?;
        let tickers = file
            .tickers
            .into_iter()
            .map(|(symbol, data)| (symbol.trim().to_ascii_uppercase(), data))
            .collect();
        Ok(Self { tickers })
    }

    fn ticker(&self, ticker: &str) -> EngineResult<&TickerData> {
        self.tickers
            .get(&ticker.trim().to_ascii_uppercase())
            .ok_or_else(|| EngineError::DataUnavailable(format!("no market data for ticker '{ticker}'")))
    }
}

impl MarketDataProvider for FixtureProvider {
    fn name(&self) -> &'static str {
        "fixture"
    }

    fn spot_price(&self, ticker: &str) -> EngineResult<f64> {
        let data = self.ticker(ticker)?;
        data.spot
            .or_else(|| data.closes.last().copied())
            .ok_or_else(|| EngineError::DataUnavailable(format!("no quote for '{ticker}'")))
    }

    fn implied_volatility(
        &self,
        ticker: &str,
        expiry: NaiveDate,
        strike: f64,
        option_type: OptionType,
    ) -> EngineResult<f64> {
        self.ticker(ticker)?
            .chain
            .iter()
            .find(|c| {
                c.expiry == expiry && c.option_type == option_type && (c.strike - strike).abs() < 1e-9
            })
            .and_then(|c| c.implied_volatility)
            .ok_or_else(|| {
                EngineError::DataUnavailable(format!(
                    "no implied volatility for {ticker} {option_type} {strike} {expiry}"
                ))
            })
    }

    fn historical_volatility(&self, ticker: &str, lookback: usize) -> EngineResult<f64> {
        volatility::historical_volatility(&self.ticker(ticker)?.closes, lookback)
    }

    fn option_chain(&self, ticker: &str) -> EngineResult<Vec<ChainContract>> {
        Ok(self
            .ticker(ticker)?
            .chain
            .iter()
            .map(|c| ChainContract {
                option_type: c.option_type,
                strike: c.strike,
                premium: c.last_price,
                expiry: c.expiry,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RAW: &str = r#"{
        "tickers": {
            "spy": {
                "closes": [500.0, 505.0, 498.0],
                "chain": [
                    {"expiry": "2026-11-20", "strike": 500.0, "type": "put", "implied_volatility": 0.18, "last_price": 9.5}
                ]
            }
        }
    }"#;

    #[test]
    fn test_spot_defaults_to_last_close_and_ticker_case_insensitive() {
        let p = FixtureProvider::from_json(RAW).unwrap();
        assert_eq!(p.spot_price("SPY").unwrap(), 498.0);
        assert_eq!(p.spot_price(" spy ").unwrap(), 498.0);
    }

    #[test]
    fn test_exact_match_required_for_implied() {
        let p = FixtureProvider::from_json(RAW).unwrap();
        let expiry = NaiveDate::from_ymd_opt(2026, 11, 20).unwrap();
        assert_eq!(p.implied_volatility("SPY", expiry, 500.0, OptionType::Put).unwrap(), 0.18);
        assert!(p.implied_volatility("SPY", expiry, 500.0, OptionType::Call).is_err());
        assert!(p.implied_volatility("SPY", expiry, 505.0, OptionType::Put).is_err());
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let err = FixtureProvider::from_json("{\"tickers\": 3}").unwrap_err();
        assert!(matches!(err, EngineError::Parse(_)), "got {err}");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = FixtureProvider::load(Path::new("/nonexistent/market.json")).unwrap_err();
        assert!(matches!(err, EngineError::Io(_)));
    }
}
