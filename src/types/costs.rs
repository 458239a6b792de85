//! Cost breakdown types

use rust_decimal::Decimal;
use serde::Serialize;

/// Per-category USD costs of executing one opportunity.
#[derive(Debug, Clone, Serialize)]
pub struct CostBreakdown {
    pub gas_cost_usd: Decimal,
    pub protocol_fee_usd: Decimal,
    pub slippage_cost_usd: Decimal,
    /// Present only for cross-chain opportunities.
    pub bridge_fee_usd: Option<Decimal>,
}

impl CostBreakdown {
    pub fn total_usd(&self) -> Decimal {
        self.gas_cost_usd
            + self.protocol_fee_usd
            + self.slippage_cost_usd
            + self.bridge_fee_usd.unwrap_or(Decimal::ZERO)
    }
}
