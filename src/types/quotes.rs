//! Price quote types

use alloy::primitives::Address;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use super::NetworkId;

/// Provenance tag for anything carrying market data. The engine refuses to
/// analyze `Simulated` inputs; upstream services that generate synthetic
/// quotes for dashboards must never feed them into the decision pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DataSource {
    Live,
    Simulated,
}

/// A single venue's quote for one token. Immutable once fetched.
#[derive(Debug, Clone, Serialize)]
pub struct PriceQuote {
    pub venue: String,
    pub price: Decimal,
    /// Taker fee as a rate, e.g. 0.003 for 30 bps.
    pub fee_rate: Decimal,
    /// Venue reliability in [0,1], maintained by the price-feed provider.
    pub reliability: Decimal,
    pub network: NetworkId,
    /// The AMM pool backing this quote; `None` for order-book venues.
    pub pool: Option<Address>,
    pub source: DataSource,
    pub quoted_at: DateTime<Utc>,
}

impl PriceQuote {
    pub fn age_secs(&self, now: DateTime<Utc>) -> i64 {
        (now - self.quoted_at).num_seconds()
    }

    /// Fee expressed in percent, the unit spreads are compared in.
    pub fn fee_pct(&self) -> Decimal {
        self.fee_rate * Decimal::ONE_HUNDRED
    }
}
