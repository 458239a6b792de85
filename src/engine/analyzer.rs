//! Engine facade: staged opportunity analysis
//!
//! `Engine` orchestrates the calculators, the liquidity validator, and the
//! gas estimator into one decision pipeline with a fixed stage order:
//! freshness → liquidity → profitability → risk → gas strategy → assembly.
//! Any stage failure aborts the call; the facade never substitutes a
//! default value for a failed financial computation.

use std::collections::HashMap;
use std::sync::Arc;
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;
use crate::calculator::{net_profit, risk_score, spread};
use crate::config::{BRIDGE_FEE_FLAT_USD, CONGESTION_REF_MULTIPLIER, EngineConfig};
use crate::errors::{AnalysisStage, EngineError, EngineResult};
use crate::gas::{network_profile, optimize_gas_strategy};
use crate::providers::{Clock, GasOracle, PoolReserveProvider, PriceFeedProvider};
use crate::scanner::scan_multiple_tokens;
use crate::types::{
    ArbitrageCandidate, ComponentHealth, CostBreakdown, DataSource, EngineStats, GasOperation,
    LiquidityCheck, NetworkId, OperationType, OpportunityDecision, OpportunityInput, PriceQuote,
    RiskInputs, ScanAndAnalyzeReport, ScanOptions, TimeConstraints, TradeCosts,
};
use crate::utils::{clamp_unit, round_usd};
use crate::validation::validate_pool_liquidity;

/// Per-network oracle readings, fetched once per analysis call and shared
/// between the risk and gas stages.
struct OracleReadings {
    gas_price_gwei: Decimal,
    native_usd_price: Decimal,
}

/// The analysis engine handle. Constructed once by the host and passed by
/// reference wherever analysis is needed; there is no process-wide
/// singleton instance.
pub struct Engine {
    config: EngineConfig,
    price_feed: Arc<dyn PriceFeedProvider>,
    reserves: Arc<dyn PoolReserveProvider>,
    gas_oracle: Arc<dyn GasOracle>,
    clock: Arc<dyn Clock>,
}

impl Engine {
    pub fn new(
        config: EngineConfig,
        price_feed: Arc<dyn PriceFeedProvider>,
        reserves: Arc<dyn PoolReserveProvider>,
        gas_oracle: Arc<dyn GasOracle>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            config,
            price_feed,
            reserves,
            gas_oracle,
            clock,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Analyze one candidate opportunity end to end.
    ///
    /// A single `now` is captured at entry and reused by every stage, so
    /// the freshness verdict cannot change mid-call.
    #[instrument(skip(self, input), fields(token = %input.token_pair))]
    pub async fn analyze(
        &self,
        input: &OpportunityInput,
        trade_amount: Decimal,
    ) -> EngineResult<OpportunityDecision> {
        let now = self.clock.now();

        // Stage 1: freshness / anti-simulation
        self.check_quote(&input.buy, now)
            .map_err(|e| e.at_stage(AnalysisStage::Freshness))?;
        self.check_quote(&input.sell, now)
            .map_err(|e| e.at_stage(AnalysisStage::Freshness))?;

        // Stage 2: liquidity
        let (worst_impact_pct, min_depth_usd) = self
            .validate_liquidity(input, trade_amount, now)
            .await
            .map_err(|e| e.at_stage(AnalysisStage::Liquidity))?;

        // Stage 3: spread and profit before gas
        let observed = spread(input.buy.price, input.sell.price)
            .map_err(|e| e.at_stage(AnalysisStage::Profitability))?;
        let cross_network = input.buy.network != input.sell.network;
        let protocol_fee_rate = input.buy.fee_rate + input.sell.fee_rate;
        let slippage_rate = worst_impact_pct / dec!(100);
        let pre_gas_costs = TradeCosts {
            gas_fee_usd: Decimal::ZERO,
            protocol_fee_rate,
            slippage_rate,
            bridge_fee_usd: if cross_network {
                BRIDGE_FEE_FLAT_USD
            } else {
                Decimal::ZERO
            },
        };
        let pre_gas = net_profit(
            input.buy.price,
            input.sell.price,
            trade_amount,
            &pre_gas_costs,
            self.config.min_profit_floor_usd,
        )
        .map_err(|e| e.at_stage(AnalysisStage::Profitability))?;

        // Stage 4: risk. The congestion factor needs live gas prices, so
        // the oracle is consulted here and its readings reused in stage 5.
        let readings = self
            .fetch_oracle_readings(input, cross_network)
            .await
            .map_err(|e| e.at_stage(AnalysisStage::Risk))?;
        let exec_time_secs = self
            .estimated_exec_secs(input, cross_network)
            .map_err(|e| e.at_stage(AnalysisStage::Risk))?;
        let congestion = self
            .congestion_level(&readings)
            .map_err(|e| e.at_stage(AnalysisStage::Risk))?;
        let risk = risk_score(
            &RiskInputs {
                slippage_pct: worst_impact_pct,
                trade_value_usd: input.buy.price * trade_amount,
                liquidity_depth_usd: min_depth_usd,
                volatility_pct: input.volatility_pct.unwrap_or(observed.pct),
                execution_time_secs: Decimal::from(exec_time_secs),
                congestion,
            },
            &self.config.risk_weights,
        );

        // Stage 5: gas cost and strategy
        if pre_gas.net_profit_usd <= Decimal::ZERO {
            return Err(EngineError::NoViableGasStrategy {
                candidates_evaluated: 0,
                reason: format!(
                    "candidate loses ${} before gas",
                    -pre_gas.net_profit_usd
                ),
            }
            .at_stage(AnalysisStage::GasStrategy));
        }
        let operations = self
            .build_operations(input, cross_network, &readings)
            .map_err(|e| e.at_stage(AnalysisStage::GasStrategy))?;
        let strategy = optimize_gas_strategy(
            pre_gas.net_profit_usd,
            &operations,
            &TimeConstraints {
                max_execution_secs: self.config.max_execution_secs,
            },
            &self.config,
        )
        .map_err(|e| e.at_stage(AnalysisStage::GasStrategy))?;

        // Stage 6: assembly
        let candidate = ArbitrageCandidate::new(
            input.token_pair.clone(),
            input.buy.clone(),
            input.sell.clone(),
            trade_amount,
            observed.pct,
            observed.pct - input.buy.fee_pct() - input.sell.fee_pct(),
            now,
        )
        .map_err(|e| e.at_stage(AnalysisStage::Assembly))?;

        let net_profit_usd = strategy.net_profit_usd;
        let is_profitable = net_profit_usd > self.config.min_profit_floor_usd;
        let costs = CostBreakdown {
            gas_cost_usd: strategy.strategy_cost_usd,
            protocol_fee_usd: round_usd(protocol_fee_rate * pre_gas.gross_value_usd),
            slippage_cost_usd: round_usd(slippage_rate * pre_gas.trade_value_usd),
            bridge_fee_usd: cross_network.then_some(BRIDGE_FEE_FLAT_USD),
        };

        let decision = OpportunityDecision {
            id: Uuid::new_v4(),
            candidate,
            costs,
            risk,
            gas_strategy: strategy,
            net_profit_usd,
            is_profitable,
            decided_at: now,
            expires_at: now + Duration::seconds(self.config.decision_expiry_secs),
        };

        info!(
            decision = %decision.id,
            net_profit = %decision.net_profit_usd,
            profitable = decision.is_profitable,
            tier = ?decision.risk.tier,
            "analysis complete"
        );
        Ok(decision)
    }

    /// Scan tokens, then run every detected candidate through `analyze`.
    /// Per-candidate failures are isolated, matching the batch-scan policy.
    pub async fn scan_and_analyze(
        &self,
        tokens: &[String],
        options: &ScanOptions,
    ) -> ScanAndAnalyzeReport {
        let batch = scan_multiple_tokens(
            Arc::clone(&self.price_feed),
            Arc::clone(&self.clock),
            tokens,
            options,
            &self.config,
        )
        .await;

        let mut analyzed = Vec::new();
        let mut rejected = 0usize;
        for scan in &batch.scans {
            for candidate in &scan.opportunities {
                let input = OpportunityInput {
                    token_pair: candidate.token_pair.clone(),
                    buy: candidate.buy.clone(),
                    sell: candidate.sell.clone(),
                    buy_pool: candidate.buy.pool,
                    sell_pool: candidate.sell.pool,
                    volatility_pct: Some(scan.market_conditions.price_dispersion_pct),
                };
                match self.analyze(&input, options.trade_amount).await {
                    Ok(decision) => analyzed.push(decision),
                    Err(e) => {
                        rejected += 1;
                        debug!(token = %candidate.token_pair, error = %e, "candidate rejected");
                    }
                }
            }
        }
        analyzed.sort_by(|a, b| b.net_profit_usd.cmp(&a.net_profit_usd));

        let recommendations = self.build_recommendations(&analyzed, rejected, &batch.summary);

        ScanAndAnalyzeReport {
            scan_summary: batch.summary,
            analyzed_opportunities: analyzed,
            recommendations,
        }
    }

    pub fn stats(&self) -> EngineStats {
        EngineStats {
            version: env!("CARGO_PKG_VERSION").to_string(),
            component_health: ComponentHealth {
                calculator: self.config.risk_weights.validate(),
                liquidity_validator: true,
                gas_estimator: !crate::gas::NETWORK_GAS_PROFILES.is_empty()
                    && !crate::gas::STRATEGY_CATALOGUE.is_empty(),
                scanner: true,
            },
            last_updated: self.clock.now(),
        }
    }

    /// Bound one provider call with the configured fetch timeout so a hung
    /// collaborator cannot stall the pipeline.
    async fn bounded_fetch<T>(
        &self,
        context: String,
        fetch: impl std::future::Future<Output = anyhow::Result<T>>,
    ) -> EngineResult<T> {
        let limit = std::time::Duration::from_secs(self.config.quote_fetch_timeout_secs);
        match tokio::time::timeout(limit, fetch).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(source)) => Err(EngineError::Upstream { context, source }),
            Err(_) => Err(EngineError::Upstream {
                context: format!("{context} timed out after {limit:?}"),
                source: anyhow::anyhow!("provider timeout"),
            }),
        }
    }

    fn check_quote(&self, quote: &PriceQuote, now: DateTime<Utc>) -> EngineResult<()> {
        if quote.source == DataSource::Simulated {
            return Err(EngineError::SimulatedDataRejected {
                venue: quote.venue.clone(),
                reason: "quote is tagged as simulated".to_string(),
            });
        }
        let age = quote.age_secs(now);
        if age > self.config.max_quote_age_secs {
            return Err(EngineError::StaleData {
                venue: quote.venue.clone(),
                quoted_at: quote.quoted_at,
                age_secs: age,
                max_age_secs: self.config.max_quote_age_secs,
            });
        }
        Ok(())
    }

    /// Validate every leg that is backed by a pool. Returns the worst
    /// price impact across the validated legs and the smallest USD depth.
    async fn validate_liquidity(
        &self,
        input: &OpportunityInput,
        trade_amount: Decimal,
        now: DateTime<Utc>,
    ) -> EngineResult<(Decimal, Decimal)> {
        let mut checks: Vec<LiquidityCheck> = Vec::new();
        let mut min_depth_usd = Decimal::MAX;

        for (quote, pool) in [
            (&input.buy, input.buy_pool),
            (&input.sell, input.sell_pool),
        ] {
            let Some(pool) = pool else { continue };

            let reserves = self
                .bounded_fetch(
                    format!("reserve fetch for pool {pool}"),
                    self.reserves.get_reserves(pool),
                )
                .await?;

            if reserves.source == DataSource::Simulated {
                return Err(EngineError::SimulatedDataRejected {
                    venue: pool.to_string(),
                    reason: "pool reserves are tagged as simulated".to_string(),
                });
            }
            let age = (now - reserves.updated_at).num_seconds();
            if age > self.config.max_quote_age_secs {
                return Err(EngineError::StaleData {
                    venue: pool.to_string(),
                    quoted_at: reserves.updated_at,
                    age_secs: age,
                    max_age_secs: self.config.max_quote_age_secs,
                });
            }

            let check = validate_pool_liquidity(&reserves, quote.price * trade_amount)?;
            if !check.is_valid {
                return Err(EngineError::InsufficientLiquidity {
                    pool: pool.to_string(),
                    trade_ratio_pct: round_usd(check.trade_ratio * dec!(100)),
                    max_ratio_pct: check.max_ratio * dec!(100),
                });
            }
            min_depth_usd = min_depth_usd.min(reserves.min_usd_depth());
            checks.push(check);
        }

        if checks.is_empty() {
            return Err(EngineError::InvalidInput {
                field: "pool_count",
                value: Decimal::ZERO,
                reason: "at least one leg must be backed by a pool".to_string(),
            });
        }

        let worst_impact = checks
            .iter()
            .map(|c| c.impact_pct)
            .max()
            .unwrap_or(Decimal::ZERO);
        Ok((worst_impact, min_depth_usd))
    }

    async fn fetch_oracle_readings(
        &self,
        input: &OpportunityInput,
        cross_network: bool,
    ) -> EngineResult<HashMap<NetworkId, OracleReadings>> {
        let mut networks = vec![input.buy.network];
        if cross_network {
            networks.push(input.sell.network);
        }

        let mut readings = HashMap::new();
        for network in networks {
            let gas_price_gwei = self
                .bounded_fetch(
                    format!("gas price for {network}"),
                    self.gas_oracle.gas_price_gwei(network),
                )
                .await?;
            let native_usd_price = self
                .bounded_fetch(
                    format!("native token price for {network}"),
                    self.gas_oracle.native_usd_price(network),
                )
                .await?;
            readings.insert(
                network,
                OracleReadings {
                    gas_price_gwei,
                    native_usd_price,
                },
            );
        }
        Ok(readings)
    }

    /// Mean congestion across the involved networks: the live gas price
    /// over a multiple of the network's reference fee level, clamped.
    fn congestion_level(
        &self,
        readings: &HashMap<NetworkId, OracleReadings>,
    ) -> EngineResult<Decimal> {
        let mut sum = Decimal::ZERO;
        for (network, reading) in readings {
            let profile = network_profile(*network)?;
            let reference = (profile.default_base_fee_gwei + profile.default_priority_fee_gwei)
                * CONGESTION_REF_MULTIPLIER;
            sum += clamp_unit(reading.gas_price_gwei / reference);
        }
        Ok(sum / Decimal::from(readings.len().max(1)))
    }

    fn estimated_exec_secs(
        &self,
        input: &OpportunityInput,
        cross_network: bool,
    ) -> EngineResult<u64> {
        let buy_secs = network_profile(input.buy.network)?.avg_confirmation_secs;
        if !cross_network {
            return Ok(buy_secs);
        }
        Ok(buy_secs + network_profile(input.sell.network)?.avg_confirmation_secs)
    }

    /// Same-network candidates execute as one atomic arbitrage
    /// transaction; cross-network ones need a swap on each side.
    fn build_operations(
        &self,
        input: &OpportunityInput,
        cross_network: bool,
        readings: &HashMap<NetworkId, OracleReadings>,
    ) -> EngineResult<Vec<GasOperation>> {
        let reading_for = |network: NetworkId| -> EngineResult<&OracleReadings> {
            readings
                .get(&network)
                .ok_or_else(|| EngineError::UnsupportedNetwork {
                    network: network.to_string(),
                })
        };

        if !cross_network {
            let reading = reading_for(input.buy.network)?;
            return Ok(vec![GasOperation {
                label: "atomic arbitrage".to_string(),
                network: input.buy.network,
                operation: OperationType::Arbitrage,
                gas_price_gwei: reading.gas_price_gwei,
                native_usd_price: reading.native_usd_price,
            }]);
        }

        let buy_reading = reading_for(input.buy.network)?;
        let sell_reading = reading_for(input.sell.network)?;
        Ok(vec![
            GasOperation {
                label: format!("buy on {}", input.buy.venue),
                network: input.buy.network,
                operation: OperationType::Swap,
                gas_price_gwei: buy_reading.gas_price_gwei,
                native_usd_price: buy_reading.native_usd_price,
            },
            GasOperation {
                label: format!("sell on {}", input.sell.venue),
                network: input.sell.network,
                operation: OperationType::Swap,
                gas_price_gwei: sell_reading.gas_price_gwei,
                native_usd_price: sell_reading.native_usd_price,
            },
        ])
    }

    fn build_recommendations(
        &self,
        analyzed: &[OpportunityDecision],
        rejected: usize,
        summary: &crate::types::ScanSummary,
    ) -> Vec<String> {
        let mut recommendations = Vec::new();

        let profitable: Vec<_> = analyzed.iter().filter(|d| d.is_profitable).collect();
        match profitable.first() {
            Some(best) => {
                recommendations.push(format!(
                    "{} profitable opportunit{} found; best nets ${} on {} via {} execution",
                    profitable.len(),
                    if profitable.len() == 1 { "y" } else { "ies" },
                    best.net_profit_usd,
                    best.candidate.token_pair,
                    best.gas_strategy.kind,
                ));
            }
            None => {
                recommendations
                    .push("no opportunity clears fees, gas, and the profit floor".to_string());
            }
        }
        if rejected > 0 {
            recommendations.push(format!(
                "{rejected} candidate(s) rejected during analysis; see logs for stages"
            ));
        }
        if summary.failed_scans > 0 {
            warn!(failed = summary.failed_scans, "some token scans failed");
            recommendations.push(format!(
                "{} token scan(s) failed; consider retrying those feeds",
                summary.failed_scans
            ));
        }

        recommendations
    }
}
