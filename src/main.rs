use heatmap_pricer::config::AppConfig;
use heatmap_pricer::feeds::fixture::FixtureProvider;
use heatmap_pricer::feeds::MarketDataProvider;
use heatmap_pricer::server;
use heatmap_pricer::state::AppState;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    // Structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("heatmap_pricer starting");

    // Load config
    let cfg = match AppConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("config error: {e}");
            std::process::exit(1);
        }
    };

    tracing::info!(
        risk_free_rate = cfg.pricing.risk_free_rate,
        binomial_steps = cfg.pricing.binomial_steps,
        binomial_style = ?cfg.pricing.binomial_style,
        mc_paths = cfg.pricing.mc_paths,
        mc_steps = cfg.pricing.mc_steps,
        mc_style = ?cfg.pricing.mc_style,
        "pricing config loaded"
    );

    // Market data
    let provider: Arc<dyn MarketDataProvider> = match FixtureProvider::load(&cfg.market_data_path) {
        Ok(p) => Arc::new(p),
        Err(e) => {
            tracing::error!("market data error: {e}");
            std::process::exit(1);
        }
    };

    let port = cfg.server_port;
    let app = match server::router(AppState::new(cfg, provider)) {
        Ok(app) => app,
        Err(e) => {
            tracing::error!("router error: {e}");
            std::process::exit(1);
        }
    };

    let addr = format!("0.0.0.0:{port}");
    tracing::info!("server listening on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("bind error: {e}");
            std::process::exit(1);
        });

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("server error: {e}");
    }
}
