//! Composite risk scoring

use rust_decimal::Decimal;
use crate::config::{
    EXEC_TIME_REF_SECS, RiskWeights, SLIPPAGE_REF_PCT, VOLATILITY_REF_PCT,
};
use crate::types::{RiskAssessment, RiskFactorContributions, RiskInputs, RiskTier};
use crate::utils::clamp_unit;

fn normalized(value: Decimal, reference: Decimal) -> Decimal {
    if reference <= Decimal::ZERO {
        return Decimal::ONE;
    }
    clamp_unit(value / reference)
}

/// Weighted composite of five normalized risk factors. The weights must sum
/// to 1 (see [`RiskWeights::validate`]); each factor's contribution is its
/// weight times the normalized sub-score, so contributions also sum to the
/// composite. Output is clamped to [0,1] and bucketed into tiers.
pub fn risk_score(inputs: &RiskInputs, weights: &RiskWeights) -> RiskAssessment {
    let slippage = normalized(inputs.slippage_pct, SLIPPAGE_REF_PCT);
    let execution_time = normalized(inputs.execution_time_secs, EXEC_TIME_REF_SECS);
    let volatility = normalized(inputs.volatility_pct, VOLATILITY_REF_PCT);
    // Inverse depth: the deeper the pool relative to the trade, the lower
    // the score. A missing or zero depth reads as maximal risk.
    let liquidity = if inputs.liquidity_depth_usd <= Decimal::ZERO {
        Decimal::ONE
    } else {
        clamp_unit(inputs.trade_value_usd / inputs.liquidity_depth_usd)
    };
    let congestion = clamp_unit(inputs.congestion);

    let factors = RiskFactorContributions {
        slippage: weights.slippage * slippage,
        liquidity: weights.liquidity * liquidity,
        volatility: weights.volatility * volatility,
        execution_time: weights.execution_time * execution_time,
        congestion: weights.congestion * congestion,
    };

    let score = clamp_unit(
        factors.slippage
            + factors.liquidity
            + factors.volatility
            + factors.execution_time
            + factors.congestion,
    );

    RiskAssessment {
        score,
        tier: RiskTier::from_score(score),
        factors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn calm_market() -> RiskInputs {
        RiskInputs {
            slippage_pct: dec!(0.1),
            trade_value_usd: dec!(1_000),
            liquidity_depth_usd: dec!(5_000_000),
            volatility_pct: dec!(0.5),
            execution_time_secs: dec!(10),
            congestion: dec!(0.1),
        }
    }

    #[test]
    fn calm_market_scores_low() {
        let assessment = risk_score(&calm_market(), &RiskWeights::default());
        assert_eq!(assessment.tier, RiskTier::Low);
        assert!(assessment.is_acceptable());
    }

    #[test]
    fn saturated_factors_score_critical() {
        let inputs = RiskInputs {
            slippage_pct: dec!(50),
            trade_value_usd: dec!(1_000_000),
            liquidity_depth_usd: dec!(100),
            volatility_pct: dec!(80),
            execution_time_secs: dec!(3600),
            congestion: dec!(1),
        };
        let assessment = risk_score(&inputs, &RiskWeights::default());
        assert_eq!(assessment.score, dec!(1));
        assert_eq!(assessment.tier, RiskTier::Critical);
    }

    #[test]
    fn zero_depth_maxes_the_liquidity_factor() {
        let mut inputs = calm_market();
        inputs.liquidity_depth_usd = dec!(0);
        let weights = RiskWeights::default();
        let assessment = risk_score(&inputs, &weights);
        assert_eq!(assessment.factors.liquidity, weights.liquidity);
    }

    #[test]
    fn contributions_sum_to_score() {
        let assessment = risk_score(&calm_market(), &RiskWeights::default());
        let sum = assessment.factors.slippage
            + assessment.factors.liquidity
            + assessment.factors.volatility
            + assessment.factors.execution_time
            + assessment.factors.congestion;
        assert_eq!(assessment.score, sum);
    }

    proptest! {
        #[test]
        fn score_is_always_in_unit_interval(
            slippage in 0.0f64..100.0,
            trade in 1.0f64..10_000_000.0,
            depth in 0.0f64..10_000_000.0,
            volatility in 0.0f64..200.0,
            exec_secs in 0.0f64..7200.0,
            congestion in 0.0f64..2.0,
        ) {
            let inputs = RiskInputs {
                slippage_pct: Decimal::from_f64_retain(slippage).unwrap(),
                trade_value_usd: Decimal::from_f64_retain(trade).unwrap(),
                liquidity_depth_usd: Decimal::from_f64_retain(depth).unwrap(),
                volatility_pct: Decimal::from_f64_retain(volatility).unwrap(),
                execution_time_secs: Decimal::from_f64_retain(exec_secs).unwrap(),
                congestion: Decimal::from_f64_retain(congestion).unwrap(),
            };
            let assessment = risk_score(&inputs, &RiskWeights::default());
            prop_assert!(assessment.score >= dec!(0));
            prop_assert!(assessment.score <= dec!(1));
        }
    }
}
