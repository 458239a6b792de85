//! Arbitrage candidate and decision types

use alloy::primitives::Address;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;
use crate::errors::{EngineError, EngineResult};
use super::{CostBreakdown, PriceQuote, RiskAssessment, StrategyRecommendation};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SpreadDirection {
    /// First price is lower: buy there, sell at the second venue.
    BuyFirstSellSecond,
    /// Second price is lower: buy there, sell at the first venue.
    BuySecondSellFirst,
    Flat,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Spread {
    /// Relative difference over the cheaper price, in percent.
    pub pct: Decimal,
    pub direction: SpreadDirection,
}

/// Cost inputs to the net-profit computation, all expressed against the
/// trade being analyzed.
#[derive(Debug, Clone, Default)]
pub struct TradeCosts {
    pub gas_fee_usd: Decimal,
    /// Applied to the gross (sell-side) value.
    pub protocol_fee_rate: Decimal,
    /// Applied to the deployed (buy-side) trade value.
    pub slippage_rate: Decimal,
    pub bridge_fee_usd: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfitBreakdown {
    pub trade_value_usd: Decimal,
    pub gross_value_usd: Decimal,
    pub gross_profit_usd: Decimal,
    pub total_cost_usd: Decimal,
    pub net_profit_usd: Decimal,
    pub is_profitable: bool,
}

/// A candidate venue pair for one token. `spread_pct` and `net_spread_pct`
/// are derived from the constituent quotes at construction and cannot be
/// assigned from outside.
#[derive(Debug, Clone, Serialize)]
pub struct ArbitrageCandidate {
    pub token_pair: String,
    pub buy: PriceQuote,
    pub sell: PriceQuote,
    pub trade_amount: Decimal,
    spread_pct: Decimal,
    net_spread_pct: Decimal,
    pub detected_at: DateTime<Utc>,
}

impl ArbitrageCandidate {
    pub(crate) fn new(
        token_pair: String,
        buy: PriceQuote,
        sell: PriceQuote,
        trade_amount: Decimal,
        spread_pct: Decimal,
        net_spread_pct: Decimal,
        detected_at: DateTime<Utc>,
    ) -> EngineResult<Self> {
        for (field, price) in [("buy_price", buy.price), ("sell_price", sell.price)] {
            if price <= Decimal::ZERO {
                return Err(EngineError::InvalidInput {
                    field,
                    value: price,
                    reason: "candidate prices must be positive".to_string(),
                });
            }
        }
        Ok(Self {
            token_pair,
            buy,
            sell,
            trade_amount,
            spread_pct,
            net_spread_pct,
            detected_at,
        })
    }

    pub fn spread_pct(&self) -> Decimal {
        self.spread_pct
    }

    /// Spread remaining after both venues' fees.
    pub fn net_spread_pct(&self) -> Decimal {
        self.net_spread_pct
    }

    pub fn combined_reliability(&self) -> Decimal {
        self.buy.reliability + self.sell.reliability
    }
}

/// What a host hands to `Engine::analyze`: the venue pair plus the pools
/// backing each leg, so the liquidity gate knows where to look. A `None`
/// pool marks an order-book venue; at least one leg must carry a pool.
#[derive(Debug, Clone)]
pub struct OpportunityInput {
    pub token_pair: String,
    pub buy: PriceQuote,
    pub sell: PriceQuote,
    pub buy_pool: Option<Address>,
    pub sell_pool: Option<Address>,
    /// Observed market volatility in percent, if the host tracks it.
    pub volatility_pct: Option<Decimal>,
}

/// Final output of one analysis call. Created once, immutable, and stale
/// after `expires_at`; the execution collaborator must discard it then.
#[derive(Debug, Clone, Serialize)]
pub struct OpportunityDecision {
    pub id: Uuid,
    pub candidate: ArbitrageCandidate,
    pub costs: CostBreakdown,
    pub risk: RiskAssessment,
    pub gas_strategy: StrategyRecommendation,
    pub net_profit_usd: Decimal,
    pub is_profitable: bool,
    pub decided_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}
