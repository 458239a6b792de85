//! Injected collaborator interfaces
//!
//! The engine owns no I/O. Price feeds, pool reserves, gas pricing, and the
//! clock are all supplied by the host behind these traits; any caching or
//! TTL policy belongs to the implementations, never to the engine.

use alloy::primitives::Address;
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use crate::types::{NetworkId, PoolReserves, PriceQuote};

#[async_trait]
pub trait PriceFeedProvider: Send + Sync {
    /// Current quotes for one token across every venue the provider covers.
    async fn get_quotes(&self, token: &str) -> Result<Vec<PriceQuote>>;
}

#[async_trait]
pub trait PoolReserveProvider: Send + Sync {
    async fn get_reserves(&self, pool: Address) -> Result<PoolReserves>;
}

#[async_trait]
pub trait GasOracle: Send + Sync {
    async fn gas_price_gwei(&self, network: NetworkId) -> Result<Decimal>;
    async fn native_usd_price(&self, network: NetworkId) -> Result<Decimal>;
}

/// Injectable time source so freshness checks are deterministic in tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
