pub mod greeks;
pub mod metrics;
