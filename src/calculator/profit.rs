//! Net profit calculation

use rust_decimal::Decimal;
use crate::errors::{EngineError, EngineResult};
use crate::types::{ProfitBreakdown, TradeCosts};
use crate::utils::round_usd;

/// Net profit of buying `amount` at `price_in` and selling at `price_out`,
/// after gas, protocol fees, slippage, and any bridge fee.
///
/// Protocol fees apply to the gross (sell-side) value, slippage to the
/// deployed (buy-side) value. `is_profitable` compares the net against the
/// caller's minimum-profit floor, not against zero.
pub fn net_profit(
    price_in: Decimal,
    price_out: Decimal,
    amount: Decimal,
    costs: &TradeCosts,
    min_profit_floor_usd: Decimal,
) -> EngineResult<ProfitBreakdown> {
    for (field, value) in [
        ("price_in", price_in),
        ("price_out", price_out),
        ("amount", amount),
    ] {
        if value <= Decimal::ZERO {
            return Err(EngineError::InvalidInput {
                field,
                value,
                reason: "must be positive".to_string(),
            });
        }
    }

    let trade_value = price_in * amount;
    let gross_value = price_out * amount;
    let gross_profit = gross_value - trade_value;

    let total_cost = costs.gas_fee_usd
        + costs.protocol_fee_rate * gross_value
        + costs.slippage_rate * trade_value
        + costs.bridge_fee_usd;

    let net = round_usd(gross_profit - total_cost);

    Ok(ProfitBreakdown {
        trade_value_usd: round_usd(trade_value),
        gross_value_usd: round_usd(gross_value),
        gross_profit_usd: round_usd(gross_profit),
        total_cost_usd: round_usd(total_cost),
        net_profit_usd: net,
        is_profitable: net > min_profit_floor_usd,
    })
}
