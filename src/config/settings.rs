//! Engine configuration settings and environment variable handling

use rust_decimal::prelude::*;
use rust_decimal_macros::dec;
use std::env;
use std::str::FromStr;

// Freshness policy
pub const MAX_QUOTE_AGE_SECS: i64 = 120;
pub const DECISION_EXPIRY_SECS: i64 = 60;

// Profitability thresholds
pub const MIN_PROFIT_FLOOR_USD: Decimal = dec!(0.10);
pub const MIN_SPREAD_MARGIN_PCT: Decimal = dec!(0.1); // on top of venue fees

// Risk tier cut points (composite score in [0,1])
pub const RISK_TIER_LOW_MAX: Decimal = dec!(0.25);
pub const RISK_TIER_MEDIUM_MAX: Decimal = dec!(0.5);
pub const RISK_TIER_HIGH_MAX: Decimal = dec!(0.75);

// Risk-score normalization references
pub const SLIPPAGE_REF_PCT: Decimal = dec!(5); // 5% slippage saturates the sub-score
pub const EXEC_TIME_REF_SECS: Decimal = dec!(300);
pub const VOLATILITY_REF_PCT: Decimal = dec!(10);

// Gas economics
pub const GAS_USAGE_RATIO: Decimal = dec!(0.8);
pub const GAS_COST_HIGH_RISK_USD: Decimal = dec!(50);
pub const BOTTLENECK_HIGH_RISK_SECS: u64 = 180;
pub const MAX_EXECUTION_SECS: u64 = 300;
/// Gas price at this multiple of the network's reference base fee reads as
/// fully congested.
pub const CONGESTION_REF_MULTIPLIER: Decimal = dec!(2);
/// Flat bridge fee applied to cross-network opportunities.
pub const BRIDGE_FEE_FLAT_USD: Decimal = dec!(3);

// Scanner limits
pub const QUOTE_FETCH_TIMEOUT_SECS: u64 = 5;
pub const MAX_SCAN_CONCURRENCY: usize = 8;

/// Relative weight of each risk factor. Historically fixed in source;
/// exposed as a struct so hosts can tune it without a code change.
/// Weights must sum to 1 (see [`RiskWeights::validate`]).
#[derive(Debug, Clone, PartialEq)]
pub struct RiskWeights {
    pub slippage: Decimal,
    pub liquidity: Decimal,
    pub volatility: Decimal,
    pub execution_time: Decimal,
    pub congestion: Decimal,
}

impl Default for RiskWeights {
    fn default() -> Self {
        Self {
            slippage: dec!(0.20),
            liquidity: dec!(0.25),
            volatility: dec!(0.25),
            execution_time: dec!(0.15),
            congestion: dec!(0.15),
        }
    }
}

impl RiskWeights {
    pub fn sum(&self) -> Decimal {
        self.slippage + self.liquidity + self.volatility + self.execution_time + self.congestion
    }

    pub fn validate(&self) -> bool {
        self.sum() == Decimal::ONE
    }
}

#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Quotes and reserves older than this never reach the calculators.
    pub max_quote_age_secs: i64,
    /// How long an emitted decision stays actionable.
    pub decision_expiry_secs: i64,
    pub min_profit_floor_usd: Decimal,
    /// Spread must exceed both venues' fees plus this margin, in percent.
    pub min_spread_margin_pct: Decimal,
    /// Fraction of the gas limit a typical execution actually consumes.
    pub gas_usage_ratio: Decimal,
    pub gas_cost_high_risk_usd: Decimal,
    pub bottleneck_high_risk_secs: u64,
    /// Time budget handed to the strategy optimizer.
    pub max_execution_secs: u64,
    pub quote_fetch_timeout_secs: u64,
    pub max_scan_concurrency: usize,
    pub risk_weights: RiskWeights,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_quote_age_secs: MAX_QUOTE_AGE_SECS,
            decision_expiry_secs: DECISION_EXPIRY_SECS,
            min_profit_floor_usd: MIN_PROFIT_FLOOR_USD,
            min_spread_margin_pct: MIN_SPREAD_MARGIN_PCT,
            gas_usage_ratio: GAS_USAGE_RATIO,
            gas_cost_high_risk_usd: GAS_COST_HIGH_RISK_USD,
            bottleneck_high_risk_secs: BOTTLENECK_HIGH_RISK_SECS,
            max_execution_secs: MAX_EXECUTION_SECS,
            quote_fetch_timeout_secs: QUOTE_FETCH_TIMEOUT_SECS,
            max_scan_concurrency: MAX_SCAN_CONCURRENCY,
            risk_weights: RiskWeights::default(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from environment variables, falling back to the
    /// named defaults above. Values are clamped to sane bounds rather than
    /// rejected, matching how the hosting services treat partial env files.
    pub fn load() -> Self {
        dotenv::dotenv().ok();

        Self {
            max_quote_age_secs: env::var("MAX_QUOTE_AGE_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(MAX_QUOTE_AGE_SECS)
                .max(1),
            decision_expiry_secs: env::var("DECISION_EXPIRY_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DECISION_EXPIRY_SECS)
                .max(1),
            min_profit_floor_usd: env::var("MIN_PROFIT_FLOOR_USD")
                .ok()
                .and_then(|s| Decimal::from_str(&s).ok())
                .unwrap_or(MIN_PROFIT_FLOOR_USD)
                .max(Decimal::ZERO),
            min_spread_margin_pct: env::var("MIN_SPREAD_MARGIN_PCT")
                .ok()
                .and_then(|s| Decimal::from_str(&s).ok())
                .unwrap_or(MIN_SPREAD_MARGIN_PCT)
                .max(Decimal::ZERO),
            gas_usage_ratio: env::var("GAS_USAGE_RATIO")
                .ok()
                .and_then(|s| Decimal::from_str(&s).ok())
                .unwrap_or(GAS_USAGE_RATIO)
                .max(dec!(0.1))
                .min(Decimal::ONE),
            gas_cost_high_risk_usd: env::var("GAS_COST_HIGH_RISK_USD")
                .ok()
                .and_then(|s| Decimal::from_str(&s).ok())
                .unwrap_or(GAS_COST_HIGH_RISK_USD)
                .max(Decimal::ZERO),
            bottleneck_high_risk_secs: env::var("BOTTLENECK_HIGH_RISK_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(BOTTLENECK_HIGH_RISK_SECS)
                .max(1),
            max_execution_secs: env::var("MAX_EXECUTION_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(MAX_EXECUTION_SECS)
                .max(1),
            quote_fetch_timeout_secs: env::var("QUOTE_FETCH_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(QUOTE_FETCH_TIMEOUT_SECS)
                .max(1),
            max_scan_concurrency: env::var("MAX_SCAN_CONCURRENCY")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(MAX_SCAN_CONCURRENCY)
                .max(1),
            risk_weights: RiskWeights::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_weights_sum_to_one() {
        assert!(RiskWeights::default().validate());
    }

    #[test]
    fn default_config_preserves_named_constants() {
        let config = EngineConfig::default();
        assert_eq!(config.max_quote_age_secs, 120);
        assert_eq!(config.min_profit_floor_usd, dec!(0.10));
        assert_eq!(config.gas_usage_ratio, dec!(0.8));
    }
}
