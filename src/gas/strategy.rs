//! Execution strategy optimization

use lazy_static::lazy_static;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal_macros::dec;
use tracing::debug;
use crate::config::EngineConfig;
use crate::errors::{EngineError, EngineResult};
use crate::types::{GasOperation, StrategyKind, StrategyRecommendation, TimeConstraints};
use crate::utils::round_usd;
use super::estimator::estimate_arbitrage_gas;

/// Deterministic cost / success / speed heuristics for one named strategy.
#[derive(Debug, Clone)]
pub struct StrategyProfile {
    pub kind: StrategyKind,
    pub cost_multiplier: Decimal,
    pub success_rate: Decimal,
    pub time_factor: Decimal,
}

lazy_static! {
    pub static ref STRATEGY_CATALOGUE: Vec<StrategyProfile> = vec![
        StrategyProfile {
            kind: StrategyKind::Standard,
            cost_multiplier: dec!(1.0),
            success_rate: dec!(0.95),
            time_factor: dec!(1.0),
        },
        StrategyProfile {
            kind: StrategyKind::Batched,
            cost_multiplier: dec!(0.85),
            success_rate: dec!(0.90),
            time_factor: dec!(1.3),
        },
        StrategyProfile {
            kind: StrategyKind::HighPriority,
            cost_multiplier: dec!(1.5),
            success_rate: dec!(0.98),
            time_factor: dec!(0.6),
        },
        StrategyProfile {
            kind: StrategyKind::FlashLoanAssisted,
            cost_multiplier: dec!(1.25),
            success_rate: dec!(0.92),
            time_factor: dec!(0.8),
        },
    ];
}

/// Pick the execution strategy with the best composite score among those
/// that stay profitable and finish inside the time budget.
///
/// `composite = profit_ratio * success_rate * time_score` where
/// `profit_ratio = net_profit / expected_profit` and
/// `time_score = max(0, 1 - exec_time / max_time)`. Strategies with
/// `net_profit <= 0` or `exec_time > max_time` are never recommended.
pub fn optimize_gas_strategy(
    expected_profit_usd: Decimal,
    operations: &[GasOperation],
    constraints: &TimeConstraints,
    config: &EngineConfig,
) -> EngineResult<StrategyRecommendation> {
    if expected_profit_usd <= Decimal::ZERO {
        return Err(EngineError::InvalidInput {
            field: "expected_profit_usd",
            value: expected_profit_usd,
            reason: "expected profit must be positive".to_string(),
        });
    }
    if constraints.max_execution_secs == 0 {
        return Err(EngineError::InvalidInput {
            field: "max_execution_secs",
            value: Decimal::ZERO,
            reason: "time budget must be positive".to_string(),
        });
    }

    let report = estimate_arbitrage_gas(operations, config)?;
    // Legs confirm sequentially, so the base time is the sum, not the max.
    let base_time_secs: u64 = report.steps.iter().map(|s| s.confirmation_secs).sum();
    let max_secs = Decimal::from(constraints.max_execution_secs);

    let mut best: Option<StrategyRecommendation> = None;
    let mut over_budget = 0usize;
    let mut unprofitable = 0usize;

    for profile in STRATEGY_CATALOGUE.iter() {
        let strategy_cost = round_usd(report.total_cost_usd * profile.cost_multiplier);
        let exec_time_secs = (Decimal::from(base_time_secs) * profile.time_factor)
            .ceil()
            .to_u64()
            .unwrap_or(u64::MAX);
        let net_profit = round_usd(expected_profit_usd - strategy_cost);

        if exec_time_secs > constraints.max_execution_secs {
            over_budget += 1;
            continue;
        }
        if net_profit <= Decimal::ZERO {
            unprofitable += 1;
            continue;
        }

        let profit_ratio = net_profit / expected_profit_usd;
        let time_score =
            (Decimal::ONE - Decimal::from(exec_time_secs) / max_secs).max(Decimal::ZERO);
        let composite_score = profit_ratio * profile.success_rate * time_score;

        debug!(
            strategy = %profile.kind,
            %net_profit,
            %composite_score,
            "evaluated gas strategy"
        );

        let candidate = StrategyRecommendation {
            kind: profile.kind,
            strategy_cost_usd: strategy_cost,
            net_profit_usd: net_profit,
            profit_ratio,
            success_rate: profile.success_rate,
            exec_time_secs,
            time_score,
            composite_score,
        };

        let better = match &best {
            None => true,
            Some(current) => candidate.composite_score > current.composite_score,
        };
        if better {
            best = Some(candidate);
        }
    }

    best.ok_or_else(|| EngineError::NoViableGasStrategy {
        candidates_evaluated: STRATEGY_CATALOGUE.len(),
        reason: format!(
            "{unprofitable} unprofitable, {over_budget} over the {}s budget",
            constraints.max_execution_secs
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{NetworkId, OperationType};

    fn leg(network: NetworkId) -> GasOperation {
        GasOperation {
            label: "leg".to_string(),
            network,
            operation: OperationType::Swap,
            gas_price_gwei: dec!(30),
            native_usd_price: dec!(3000),
        }
    }

    #[test]
    fn recommendation_is_always_viable() {
        let rec = optimize_gas_strategy(
            dec!(100),
            &[leg(NetworkId::Ethereum), leg(NetworkId::Ethereum)],
            &TimeConstraints { max_execution_secs: 300 },
            &EngineConfig::default(),
        )
        .unwrap();
        assert!(rec.net_profit_usd > dec!(0));
        assert!(rec.exec_time_secs <= 300);
        assert!(rec.composite_score > dec!(0));
    }

    #[test]
    fn tight_deadline_prefers_high_priority() {
        // Two Ethereum legs: 120s standard. A 100s budget only fits the
        // faster strategies.
        let rec = optimize_gas_strategy(
            dec!(500),
            &[leg(NetworkId::Ethereum), leg(NetworkId::Ethereum)],
            &TimeConstraints { max_execution_secs: 100 },
            &EngineConfig::default(),
        )
        .unwrap();
        assert!(matches!(
            rec.kind,
            StrategyKind::HighPriority | StrategyKind::FlashLoanAssisted
        ));
        assert!(rec.exec_time_secs <= 100);
    }

    #[test]
    fn tiny_profit_yields_no_viable_strategy() {
        // Two Ethereum swaps cost ~$21.60 standard; $1 expected profit
        // cannot cover any strategy.
        let result = optimize_gas_strategy(
            dec!(1),
            &[leg(NetworkId::Ethereum), leg(NetworkId::Ethereum)],
            &TimeConstraints { max_execution_secs: 300 },
            &EngineConfig::default(),
        );
        assert!(matches!(result, Err(EngineError::NoViableGasStrategy { .. })));
    }

    #[test]
    fn impossible_deadline_yields_no_viable_strategy() {
        let result = optimize_gas_strategy(
            dec!(1000),
            &[leg(NetworkId::Ethereum), leg(NetworkId::Ethereum)],
            &TimeConstraints { max_execution_secs: 10 },
            &EngineConfig::default(),
        );
        assert!(matches!(result, Err(EngineError::NoViableGasStrategy { .. })));
    }

    #[test]
    fn rejects_non_positive_expected_profit() {
        let result = optimize_gas_strategy(
            dec!(0),
            &[leg(NetworkId::Base)],
            &TimeConstraints { max_execution_secs: 60 },
            &EngineConfig::default(),
        );
        assert!(matches!(result, Err(EngineError::InvalidInput { .. })));
    }
}
