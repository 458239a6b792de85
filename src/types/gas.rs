//! Gas estimation and strategy types

use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use crate::errors::EngineError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum NetworkId {
    Ethereum,
    Arbitrum,
    Optimism,
    Base,
    Polygon,
}

impl fmt::Display for NetworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NetworkId::Ethereum => "ethereum",
            NetworkId::Arbitrum => "arbitrum",
            NetworkId::Optimism => "optimism",
            NetworkId::Base => "base",
            NetworkId::Polygon => "polygon",
        };
        f.write_str(name)
    }
}

impl FromStr for NetworkId {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ethereum" | "mainnet" => Ok(NetworkId::Ethereum),
            "arbitrum" => Ok(NetworkId::Arbitrum),
            "optimism" => Ok(NetworkId::Optimism),
            "base" => Ok(NetworkId::Base),
            "polygon" => Ok(NetworkId::Polygon),
            other => Err(EngineError::UnsupportedNetwork {
                network: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum OperationType {
    Transfer,
    Swap,
    FlashLoan,
    Arbitrage,
    Complex,
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OperationType::Transfer => "transfer",
            OperationType::Swap => "swap",
            OperationType::FlashLoan => "flashloan",
            OperationType::Arbitrage => "arbitrage",
            OperationType::Complex => "complex",
        };
        f.write_str(name)
    }
}

impl FromStr for OperationType {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "transfer" => Ok(OperationType::Transfer),
            "swap" => Ok(OperationType::Swap),
            "flashloan" | "flash_loan" => Ok(OperationType::FlashLoan),
            "arbitrage" => Ok(OperationType::Arbitrage),
            "complex" => Ok(OperationType::Complex),
            other => Err(EngineError::UnsupportedOperationType {
                operation: other.to_string(),
            }),
        }
    }
}

/// Live pricing inputs for a gas estimate. Always injected by the caller
/// (ultimately the `GasOracle`); the estimator never fetches or caches them.
#[derive(Debug, Clone)]
pub struct GasPriceParams {
    pub gas_price_gwei: Decimal,
    pub native_usd_price: Decimal,
    /// Fraction of the gas limit actually consumed; `None` uses the
    /// configured default.
    pub usage_ratio: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GasCostEstimate {
    pub network: NetworkId,
    pub operation: OperationType,
    pub gas_limit: u64,
    pub gas_used: Decimal,
    pub cost_usd: Decimal,
    pub confirmation_secs: u64,
}

/// One step of a multi-leg arbitrage execution.
#[derive(Debug, Clone)]
pub struct GasOperation {
    pub label: String,
    pub network: NetworkId,
    pub operation: OperationType,
    pub gas_price_gwei: Decimal,
    pub native_usd_price: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct StepCost {
    pub label: String,
    pub cost_usd: Decimal,
    pub share_pct: Decimal,
    pub confirmation_secs: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ArbitrageGasReport {
    pub total_cost_usd: Decimal,
    pub steps: Vec<StepCost>,
    /// Index into `steps` of the slowest-confirming leg.
    pub bottleneck_index: usize,
    pub bottleneck_secs: u64,
    pub high_risk: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StrategyKind {
    Standard,
    Batched,
    HighPriority,
    FlashLoanAssisted,
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StrategyKind::Standard => "standard",
            StrategyKind::Batched => "batched",
            StrategyKind::HighPriority => "high-priority",
            StrategyKind::FlashLoanAssisted => "flash-loan-assisted",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TimeConstraints {
    pub max_execution_secs: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct StrategyRecommendation {
    pub kind: StrategyKind,
    pub strategy_cost_usd: Decimal,
    pub net_profit_usd: Decimal,
    pub profit_ratio: Decimal,
    pub success_rate: Decimal,
    pub exec_time_secs: u64,
    pub time_score: Decimal,
    pub composite_score: Decimal,
}
