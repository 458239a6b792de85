//! Gas cost estimation

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::warn;
use crate::config::EngineConfig;
use crate::errors::{EngineError, EngineResult};
use crate::types::{
    ArbitrageGasReport, GasCostEstimate, GasOperation, GasPriceParams, NetworkId, OperationType,
    StepCost,
};
use crate::utils::round_usd;
use super::tables::network_profile;

const GWEI_PER_NATIVE: Decimal = dec!(1_000_000_000);

/// USD cost of one operation on one network.
/// `gas_used = gas_limit * usage_ratio`; the ratio defaults to the
/// configured value since executions rarely consume the full limit.
pub fn estimate_gas_cost(
    network: NetworkId,
    operation: OperationType,
    params: &GasPriceParams,
    config: &EngineConfig,
) -> EngineResult<GasCostEstimate> {
    let profile = network_profile(network)?;

    for (field, value) in [
        ("gas_price_gwei", params.gas_price_gwei),
        ("native_usd_price", params.native_usd_price),
    ] {
        if value <= Decimal::ZERO {
            return Err(EngineError::InvalidInput {
                field,
                value,
                reason: "must be positive".to_string(),
            });
        }
    }

    let usage_ratio = params.usage_ratio.unwrap_or(config.gas_usage_ratio);
    if usage_ratio <= Decimal::ZERO || usage_ratio > Decimal::ONE {
        return Err(EngineError::InvalidInput {
            field: "usage_ratio",
            value: usage_ratio,
            reason: "usage ratio must be in (0, 1]".to_string(),
        });
    }

    let gas_limit = profile.limits.for_operation(operation);
    let gas_used = Decimal::from(gas_limit) * usage_ratio;
    let cost_usd = round_usd(
        gas_used * params.gas_price_gwei / GWEI_PER_NATIVE * params.native_usd_price,
    );

    Ok(GasCostEstimate {
        network,
        operation,
        gas_limit,
        gas_used,
        cost_usd,
        confirmation_secs: profile.avg_confirmation_secs,
    })
}

/// Aggregate the gas cost of a multi-step execution: total USD cost,
/// per-step share of that total, and the slowest-confirming step as the
/// bottleneck. Flags HIGH risk when the total cost or the bottleneck time
/// exceeds the configured thresholds.
pub fn estimate_arbitrage_gas(
    operations: &[GasOperation],
    config: &EngineConfig,
) -> EngineResult<ArbitrageGasReport> {
    if operations.is_empty() {
        return Err(EngineError::InvalidInput {
            field: "operations",
            value: Decimal::ZERO,
            reason: "at least one operation is required".to_string(),
        });
    }

    let mut estimates = Vec::with_capacity(operations.len());
    for op in operations {
        let estimate = estimate_gas_cost(
            op.network,
            op.operation,
            &GasPriceParams {
                gas_price_gwei: op.gas_price_gwei,
                native_usd_price: op.native_usd_price,
                usage_ratio: None,
            },
            config,
        )?;
        estimates.push(estimate);
    }

    let total_cost_usd = round_usd(estimates.iter().map(|e| e.cost_usd).sum());

    let (bottleneck_index, bottleneck_secs) = estimates
        .iter()
        .enumerate()
        .map(|(i, e)| (i, e.confirmation_secs))
        .max_by_key(|(_, secs)| *secs)
        .unwrap_or((0, 0));

    let steps = operations
        .iter()
        .zip(&estimates)
        .map(|(op, estimate)| {
            let share_pct = if total_cost_usd > Decimal::ZERO {
                round_usd(estimate.cost_usd / total_cost_usd * dec!(100))
            } else {
                Decimal::ZERO
            };
            StepCost {
                label: op.label.clone(),
                cost_usd: estimate.cost_usd,
                share_pct,
                confirmation_secs: estimate.confirmation_secs,
            }
        })
        .collect();

    let high_risk = total_cost_usd > config.gas_cost_high_risk_usd
        || bottleneck_secs > config.bottleneck_high_risk_secs;
    if high_risk {
        warn!(
            %total_cost_usd,
            bottleneck_secs,
            "multi-step gas profile flagged HIGH risk"
        );
    }

    Ok(ArbitrageGasReport {
        total_cost_usd,
        steps,
        bottleneck_index,
        bottleneck_secs,
        high_risk,
    })
}
