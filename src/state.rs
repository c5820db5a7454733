use crate::config::AppConfig;
use crate::feeds::MarketDataProvider;
use std::sync::Arc;

// ── Application shared state (read-only after startup) ──

/// Everything a request handler needs. Nothing here is mutated after
/// startup, so handlers share it without locks.
pub struct AppState {
    pub config: AppConfig,
    pub provider: Arc<dyn MarketDataProvider>,
}

impl AppState {
    pub fn new(config: AppConfig, provider: Arc<dyn MarketDataProvider>) -> Arc<Self> {
        Arc::new(Self { config, provider })
    }
}
