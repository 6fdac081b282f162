pub mod analytics;
pub mod config;
pub mod costing;
pub mod prospects;
pub mod query;
pub mod records;
pub mod units;

#[cfg(target_arch = "wasm32")]
pub mod wasm;
