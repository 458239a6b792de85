//! Pool liquidity validation
//!
//! Gates a trade against pool depth before any profit math runs. Each
//! protocol family has its own acceptable trade-to-depth ratio and its own
//! impact adjustment; an unrecognized family is treated as constant-product,
//! the most conservative rule.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::debug;
use crate::errors::{EngineError, EngineResult};
use crate::types::{LiquidityCheck, PoolReserves, ProtocolKind, RiskTier};
use crate::utils::clamp_unit;
use super::impact::price_impact;

// Maximum trade size as a fraction of the smaller USD reserve.
pub const CONSTANT_PRODUCT_MAX_TRADE_RATIO: Decimal = dec!(0.01);
pub const CONCENTRATED_MAX_TRADE_RATIO: Decimal = dec!(0.05);
pub const STABLE_SWAP_MAX_TRADE_RATIO: Decimal = dec!(0.15);

// Effective-depth multipliers for the non-V2 curves. Concentrated positions
// and amplified stable pools quote like a constant-product pool with this
// many times the reserves around the current price.
pub const CONCENTRATION_FACTOR: Decimal = dec!(4);
pub const STABLE_AMPLIFICATION: Decimal = dec!(10);

impl ProtocolKind {
    pub fn max_trade_ratio(&self) -> Decimal {
        match self {
            ProtocolKind::ConstantProduct => CONSTANT_PRODUCT_MAX_TRADE_RATIO,
            ProtocolKind::ConcentratedLiquidity => CONCENTRATED_MAX_TRADE_RATIO,
            ProtocolKind::StableSwap => STABLE_SWAP_MAX_TRADE_RATIO,
        }
    }

    fn depth_multiplier(&self) -> Decimal {
        match self {
            ProtocolKind::ConstantProduct => Decimal::ONE,
            ProtocolKind::ConcentratedLiquidity => CONCENTRATION_FACTOR,
            ProtocolKind::StableSwap => STABLE_AMPLIFICATION,
        }
    }

    /// Price impact for this family, delegating to the one
    /// constant-product implementation with scaled effective reserves.
    pub fn compute_impact(
        &self,
        reserve_in: Decimal,
        reserve_out: Decimal,
        amount_in: Decimal,
        fee_rate: Decimal,
    ) -> EngineResult<Decimal> {
        let k = self.depth_multiplier();
        price_impact(amount_in, reserve_in * k, reserve_out * k, fee_rate)
    }
}

/// Check a trade (in USD) against one pool's depth and family rules.
pub fn validate_pool_liquidity(
    pool: &PoolReserves,
    trade_amount_usd: Decimal,
) -> EngineResult<LiquidityCheck> {
    if trade_amount_usd <= Decimal::ZERO {
        return Err(EngineError::InvalidInput {
            field: "trade_amount_usd",
            value: trade_amount_usd,
            reason: "trade amount must be positive".to_string(),
        });
    }
    let depth = pool.min_usd_depth();
    if depth <= Decimal::ZERO {
        return Err(EngineError::InvalidInput {
            field: "reserve_usd",
            value: depth,
            reason: "pool USD reserves must be positive".to_string(),
        });
    }

    let trade_ratio = trade_amount_usd / depth;
    let max_ratio = pool.protocol.max_trade_ratio();

    // Trade amount expressed in units of the input reserve.
    let amount_in = trade_amount_usd * pool.reserve_in / pool.reserve_in_usd;
    let impact_pct =
        pool.protocol
            .compute_impact(pool.reserve_in, pool.reserve_out, amount_in, pool.fee_rate)?;

    // Same 0.25/0.5/0.75 buckets as the composite risk score, applied to
    // how much of the family's allowance the trade consumes.
    let tier = RiskTier::from_score(clamp_unit(trade_ratio / max_ratio));
    let is_valid = trade_ratio < max_ratio;

    debug!(
        pool = %pool.pool,
        protocol = ?pool.protocol,
        %trade_ratio,
        %impact_pct,
        is_valid,
        "liquidity check"
    );

    Ok(LiquidityCheck {
        pool: pool.pool,
        protocol: pool.protocol,
        trade_ratio,
        max_ratio,
        impact_pct,
        tier,
        is_valid,
    })
}

/// Family-dispatched validation entry point. Kept separate from
/// [`validate_pool_liquidity`] only for call sites that resolve the family
/// from an untrusted label first.
pub fn validate_by_protocol(
    pool: &PoolReserves,
    protocol_label: &str,
    trade_amount_usd: Decimal,
) -> EngineResult<LiquidityCheck> {
    let mut resolved = pool.clone();
    resolved.protocol = ProtocolKind::from_label(protocol_label);
    validate_pool_liquidity(&resolved, trade_amount_usd)
}
