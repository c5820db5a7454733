//! Option profit-surface engine: prices one contract over a grid of
//! underlying prices and days to expiry with a selectable valuation model,
//! and derives breakeven, probability of profit and the Greeks.

pub mod config;
pub mod contract;
pub mod errors;
pub mod feeds;
pub mod heatmap;
pub mod models;
pub mod risk;
pub mod server;
pub mod state;
