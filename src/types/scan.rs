//! Scanner result types

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use super::{ArbitrageCandidate, OpportunityDecision};

/// Aggregate view of the quotes collected for one token.
#[derive(Debug, Clone, Serialize)]
pub struct MarketConditions {
    pub venue_count: usize,
    pub best_spread_pct: Decimal,
    pub mean_spread_pct: Decimal,
    /// Max quoted price over min quoted price, minus one, in percent.
    pub price_dispersion_pct: Decimal,
    pub mean_reliability: Decimal,
}

/// Result of scanning a single token. An empty `opportunities` list is a
/// valid outcome, not an error.
#[derive(Debug, Clone, Serialize)]
pub struct TokenScan {
    pub token: String,
    pub scan_amount: Decimal,
    pub opportunities: Vec<ArbitrageCandidate>,
    pub market_conditions: MarketConditions,
    pub scanned_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub trade_amount: Decimal,
    /// Overrides the configured per-fetch timeout when set.
    pub quote_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScanFailure {
    pub token: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScanSummary {
    pub successful_scans: usize,
    pub failed_scans: usize,
    pub errors: Vec<ScanFailure>,
}

/// Outcome of a multi-token scan: one entry per token that succeeded plus
/// a summary covering every token that was attempted.
#[derive(Debug, Clone, Serialize)]
pub struct BatchScan {
    pub scans: Vec<TokenScan>,
    pub summary: ScanSummary,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScanAndAnalyzeReport {
    pub scan_summary: ScanSummary,
    pub analyzed_opportunities: Vec<OpportunityDecision>,
    pub recommendations: Vec<String>,
}
