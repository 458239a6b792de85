//! Pool-related types and structures

use alloy::primitives::{Address, U256};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::str::FromStr;
use crate::errors::{EngineError, EngineResult};
use crate::utils::pow10;
use super::{DataSource, RiskTier};

/// Closed set of pool families the validator knows how to model.
/// Unknown labels deliberately map to `ConstantProduct`, the most
/// conservative rule, never to "skip validation".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ProtocolKind {
    ConstantProduct,
    ConcentratedLiquidity,
    StableSwap,
}

impl ProtocolKind {
    pub fn from_label(label: &str) -> Self {
        match label.to_ascii_lowercase().as_str() {
            "constant_product" | "uniswap_v2" | "aerodrome" | "sushiswap" => {
                ProtocolKind::ConstantProduct
            }
            "concentrated_liquidity" | "uniswap_v3" | "slipstream" => {
                ProtocolKind::ConcentratedLiquidity
            }
            "stable_swap" | "curve" => ProtocolKind::StableSwap,
            _ => ProtocolKind::ConstantProduct,
        }
    }
}

/// Reserve snapshot for one pool. Owned by the validator for the duration
/// of a single validation call and never cached inside the engine.
#[derive(Debug, Clone)]
pub struct PoolReserves {
    pub pool: Address,
    pub protocol: ProtocolKind,
    pub reserve_in: Decimal,
    pub reserve_out: Decimal,
    pub reserve_in_usd: Decimal,
    pub reserve_out_usd: Decimal,
    pub volume_24h_usd: Decimal,
    pub fees_24h_usd: Decimal,
    /// Pool swap fee as a rate, e.g. 0.003.
    pub fee_rate: Decimal,
    pub source: DataSource,
    pub updated_at: DateTime<Utc>,
}

impl PoolReserves {
    /// Scale a raw on-chain reserve word by the token's decimals.
    pub fn scale_raw_reserve(raw: U256, token_decimals: i32) -> EngineResult<Decimal> {
        let value = Decimal::from_str(&raw.to_string()).map_err(|_| EngineError::InvalidInput {
            field: "raw_reserve",
            value: Decimal::ZERO,
            reason: format!("reserve word {raw} exceeds decimal range"),
        })?;
        Ok(value / pow10(token_decimals))
    }

    pub fn min_usd_depth(&self) -> Decimal {
        self.reserve_in_usd.min(self.reserve_out_usd)
    }
}

/// Outcome of the liquidity gate for one pool and trade size.
#[derive(Debug, Clone, Serialize)]
pub struct LiquidityCheck {
    pub pool: Address,
    pub protocol: ProtocolKind,
    /// Trade size over the smaller USD reserve.
    pub trade_ratio: Decimal,
    pub max_ratio: Decimal,
    pub impact_pct: Decimal,
    pub tier: RiskTier,
    pub is_valid: bool,
}
