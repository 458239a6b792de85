//! Risk assessment types

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use crate::config::{RISK_TIER_HIGH_MAX, RISK_TIER_LOW_MAX, RISK_TIER_MEDIUM_MAX};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum RiskTier {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskTier {
    /// Bucket a composite score at the fixed 0.25 / 0.5 / 0.75 cut points.
    pub fn from_score(score: Decimal) -> Self {
        if score < RISK_TIER_LOW_MAX {
            RiskTier::Low
        } else if score < RISK_TIER_MEDIUM_MAX {
            RiskTier::Medium
        } else if score < RISK_TIER_HIGH_MAX {
            RiskTier::High
        } else {
            RiskTier::Critical
        }
    }
}

/// Raw market/execution observations the risk score is built from.
#[derive(Debug, Clone)]
pub struct RiskInputs {
    pub slippage_pct: Decimal,
    pub trade_value_usd: Decimal,
    /// Smaller USD reserve of the pool backing the trade.
    pub liquidity_depth_usd: Decimal,
    pub volatility_pct: Decimal,
    pub execution_time_secs: Decimal,
    /// Network congestion in [0,1], e.g. gas price over its reference level.
    pub congestion: Decimal,
}

/// Weighted contribution of each factor to the composite score.
/// The contributions sum to the composite score itself.
#[derive(Debug, Clone, Serialize)]
pub struct RiskFactorContributions {
    pub slippage: Decimal,
    pub liquidity: Decimal,
    pub volatility: Decimal,
    pub execution_time: Decimal,
    pub congestion: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct RiskAssessment {
    /// Composite score in [0,1].
    pub score: Decimal,
    pub tier: RiskTier,
    pub factors: RiskFactorContributions,
}

impl RiskAssessment {
    pub fn is_acceptable(&self) -> bool {
        self.tier < RiskTier::Critical
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_boundaries_are_stable() {
        assert_eq!(RiskTier::from_score(dec!(0)), RiskTier::Low);
        assert_eq!(RiskTier::from_score(dec!(0.2499)), RiskTier::Low);
        assert_eq!(RiskTier::from_score(dec!(0.25)), RiskTier::Medium);
        assert_eq!(RiskTier::from_score(dec!(0.4999)), RiskTier::Medium);
        assert_eq!(RiskTier::from_score(dec!(0.5)), RiskTier::High);
        assert_eq!(RiskTier::from_score(dec!(0.75)), RiskTier::Critical);
        assert_eq!(RiskTier::from_score(dec!(1)), RiskTier::Critical);
    }
}
