//! Arbitrage Math & Opportunity Analysis Engine
//!
//! Turns raw price quotes and pool-reserve snapshots into a
//! profitability/risk decision: spread and net-profit math, constant-product
//! price impact, pool-depth validation, multi-network gas costing, and
//! execution-strategy optimization, behind a facade with a strict
//! freshness/anti-simulation policy.
//!
//! The crate is a library with no network, file, or CLI surface of its own;
//! price feeds, pool reserves, gas pricing, and the clock are injected by
//! the hosting service (see [`providers`]).

pub mod calculator;
pub mod config;
pub mod engine;
pub mod errors;
pub mod gas;
pub mod providers;
pub mod scanner;
pub mod types;
pub mod utils;
pub mod validation;

// Re-export commonly used items
pub use config::EngineConfig;
pub use engine::Engine;
pub use errors::{AnalysisStage, EngineError, EngineResult};
pub use types::*;
