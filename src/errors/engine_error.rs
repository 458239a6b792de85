//! Custom error types for the analysis engine

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// The stage of `Engine::analyze` that produced a failure. Carried on
/// [`EngineError::Stage`] so hosts can tell a freshness rejection apart
/// from, say, a gas-strategy dead end without string matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AnalysisStage {
    Freshness,
    Liquidity,
    Profitability,
    Risk,
    GasStrategy,
    Assembly,
}

impl fmt::Display for AnalysisStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AnalysisStage::Freshness => "freshness",
            AnalysisStage::Liquidity => "liquidity",
            AnalysisStage::Profitability => "profitability",
            AnalysisStage::Risk => "risk",
            AnalysisStage::GasStrategy => "gas-strategy",
            AnalysisStage::Assembly => "assembly",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid input: {field} = {value} - {reason}")]
    InvalidInput {
        field: &'static str,
        value: Decimal,
        reason: String,
    },

    #[error("Unsupported network: {network}")]
    UnsupportedNetwork {
        network: String,
    },

    #[error("Unsupported operation type: {operation}")]
    UnsupportedOperationType {
        operation: String,
    },

    #[error("Stale data from {venue}: quoted at {quoted_at}, {age_secs}s old (max {max_age_secs}s)")]
    StaleData {
        venue: String,
        quoted_at: DateTime<Utc>,
        age_secs: i64,
        max_age_secs: i64,
    },

    #[error("Simulated data rejected from {venue}: {reason}")]
    SimulatedDataRejected {
        venue: String,
        reason: String,
    },

    #[error("Insufficient liquidity in {pool}: trade is {trade_ratio_pct}% of depth (max {max_ratio_pct}%)")]
    InsufficientLiquidity {
        pool: String,
        trade_ratio_pct: Decimal,
        max_ratio_pct: Decimal,
    },

    #[error("No viable gas strategy: {candidates_evaluated} evaluated, {reason}")]
    NoViableGasStrategy {
        candidates_evaluated: usize,
        reason: String,
    },

    #[error("Upstream collaborator failed: {context}")]
    Upstream {
        context: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Analysis stage '{stage}' failed: {source}")]
    Stage {
        stage: AnalysisStage,
        #[source]
        source: Box<EngineError>,
    },
}

impl EngineError {
    /// Wrap an error with the analysis stage it occurred in. Already-wrapped
    /// errors keep their original stage.
    pub fn at_stage(self, stage: AnalysisStage) -> Self {
        match self {
            err @ EngineError::Stage { .. } => err,
            other => EngineError::Stage {
                stage,
                source: Box::new(other),
            },
        }
    }

    /// The stage attached by [`EngineError::at_stage`], if any.
    pub fn stage(&self) -> Option<AnalysisStage> {
        match self {
            EngineError::Stage { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
