//! Token scanning across venues

use std::sync::Arc;
use std::time::Duration;
use rust_decimal::Decimal;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, warn};
use crate::config::EngineConfig;
use crate::errors::{EngineError, EngineResult};
use crate::providers::{Clock, PriceFeedProvider};
use crate::types::{BatchScan, DataSource, PriceQuote, ScanFailure, ScanOptions, ScanSummary, TokenScan};
use super::detector::{detect_opportunities, summarize_market};

/// Drop quotes the freshness policy would reject anyway. Scanning is a
/// best-effort survey, so bad quotes are skipped with a warning rather than
/// failing the whole token; `Engine::analyze` re-checks and hard-rejects.
fn usable_quotes(
    token: &str,
    quotes: Vec<PriceQuote>,
    max_age_secs: i64,
    now: chrono::DateTime<chrono::Utc>,
) -> Vec<PriceQuote> {
    quotes
        .into_iter()
        .filter(|quote| {
            if quote.source == DataSource::Simulated {
                warn!(token, venue = %quote.venue, "dropping simulated quote from scan");
                return false;
            }
            if quote.age_secs(now) > max_age_secs {
                warn!(
                    token,
                    venue = %quote.venue,
                    age_secs = quote.age_secs(now),
                    "dropping stale quote from scan"
                );
                return false;
            }
            quote.price > Decimal::ZERO
        })
        .collect()
}

/// Scan one token: fetch quotes across venues, filter unusable ones, and
/// detect candidate pairs. An empty opportunity list is a normal result.
pub async fn scan_token(
    price_feed: &dyn PriceFeedProvider,
    clock: &dyn Clock,
    token: &str,
    trade_amount: Decimal,
    config: &EngineConfig,
) -> EngineResult<TokenScan> {
    scan_token_with_timeout(
        price_feed,
        clock,
        token,
        trade_amount,
        config,
        Duration::from_secs(config.quote_fetch_timeout_secs),
    )
    .await
}

async fn scan_token_with_timeout(
    price_feed: &dyn PriceFeedProvider,
    clock: &dyn Clock,
    token: &str,
    trade_amount: Decimal,
    config: &EngineConfig,
    timeout: Duration,
) -> EngineResult<TokenScan> {
    let fetched = tokio::time::timeout(timeout, price_feed.get_quotes(token))
        .await
        .map_err(|_| EngineError::Upstream {
            context: format!("quote fetch for {token} timed out after {timeout:?}"),
            source: anyhow::anyhow!("price feed timeout"),
        })?
        .map_err(|e| EngineError::Upstream {
            context: format!("quote fetch for {token} failed"),
            source: e,
        })?;

    let now = clock.now();
    let quotes = usable_quotes(token, fetched, config.max_quote_age_secs, now);
    let opportunities = detect_opportunities(token, &quotes, trade_amount, config, now)?;
    let market_conditions = summarize_market(&quotes, &opportunities);

    debug!(
        token,
        venues = quotes.len(),
        candidates = opportunities.len(),
        "token scan complete"
    );

    Ok(TokenScan {
        token: token.to_string(),
        scan_amount: trade_amount,
        opportunities,
        market_conditions,
        scanned_at: now,
    })
}

/// Fan out one scan task per token, with at most `max_scan_concurrency`
/// fetches in flight at once. A failure on one token never aborts the
/// batch: each outcome is recorded individually in the summary. Dropping
/// the returned future (or the engine aborting the set) cancels in-flight
/// fetches without corrupting the results already collected.
pub async fn scan_multiple_tokens(
    price_feed: Arc<dyn PriceFeedProvider>,
    clock: Arc<dyn Clock>,
    tokens: &[String],
    options: &ScanOptions,
    config: &EngineConfig,
) -> BatchScan {
    let timeout = Duration::from_secs(
        options
            .quote_timeout_secs
            .unwrap_or(config.quote_fetch_timeout_secs),
    );

    let limiter = Arc::new(Semaphore::new(config.max_scan_concurrency.max(1)));

    let mut join_set = JoinSet::new();
    for token in tokens {
        let price_feed = Arc::clone(&price_feed);
        let clock = Arc::clone(&clock);
        let limiter = Arc::clone(&limiter);
        let token = token.clone();
        let config = config.clone();
        let trade_amount = options.trade_amount;
        join_set.spawn(async move {
            let _permit = match limiter.acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => {
                    return (
                        token,
                        Err(EngineError::Upstream {
                            context: "scan concurrency limiter closed".to_string(),
                            source: anyhow::anyhow!("limiter dropped mid-batch"),
                        }),
                    );
                }
            };
            let result = scan_token_with_timeout(
                price_feed.as_ref(),
                clock.as_ref(),
                &token,
                trade_amount,
                &config,
                timeout,
            )
            .await;
            (token, result)
        });
    }

    let mut scans = Vec::new();
    let mut errors = Vec::new();

    while let Some(joined) = join_set.join_next().await {
        match joined {
            Ok((_, Ok(scan))) => scans.push(scan),
            Ok((token, Err(e))) => {
                warn!(%token, error = %e, "token scan failed");
                errors.push(ScanFailure {
                    token,
                    message: e.to_string(),
                });
            }
            Err(join_error) => {
                warn!(error = %join_error, "scan task aborted");
                errors.push(ScanFailure {
                    token: "<unknown>".to_string(),
                    message: join_error.to_string(),
                });
            }
        }
    }

    // Keep batch output deterministic regardless of completion order.
    scans.sort_by(|a, b| a.token.cmp(&b.token));
    errors.sort_by(|a, b| a.token.cmp(&b.token));

    BatchScan {
        summary: ScanSummary {
            successful_scans: scans.len(),
            failed_scans: errors.len(),
            errors,
        },
        scans,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use async_trait::async_trait;
    use chrono::{DateTime, Duration as ChronoDuration, Utc};
    use rust_decimal_macros::dec;
    use crate::types::NetworkId;

    struct FixedClock(DateTime<Utc>);

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.0
        }
    }

    struct ScriptedFeed {
        failing_tokens: Vec<String>,
    }

    #[async_trait]
    impl PriceFeedProvider for ScriptedFeed {
        async fn get_quotes(&self, token: &str) -> Result<Vec<PriceQuote>> {
            if self.failing_tokens.iter().any(|t| t == token) {
                anyhow::bail!("venue unreachable for {token}");
            }
            let now = Utc::now();
            Ok(vec![
                PriceQuote {
                    venue: "venue-a".to_string(),
                    price: dec!(100),
                    fee_rate: dec!(0.003),
                    reliability: dec!(0.9),
                    network: NetworkId::Base,
                    pool: None,
                    source: DataSource::Live,
                    quoted_at: now,
                },
                PriceQuote {
                    venue: "venue-b".to_string(),
                    price: dec!(104),
                    fee_rate: dec!(0.003),
                    reliability: dec!(0.85),
                    network: NetworkId::Base,
                    pool: None,
                    source: DataSource::Live,
                    quoted_at: now,
                },
            ])
        }
    }

    #[tokio::test]
    async fn scan_token_finds_the_pair() {
        let feed = ScriptedFeed { failing_tokens: vec![] };
        let clock = FixedClock(Utc::now());
        let scan = scan_token(&feed, &clock, "WETH", dec!(1), &EngineConfig::default())
            .await
            .unwrap();
        assert_eq!(scan.opportunities.len(), 1);
        assert_eq!(scan.market_conditions.venue_count, 2);
    }

    #[tokio::test]
    async fn one_failing_token_does_not_abort_the_batch() {
        let feed: Arc<dyn PriceFeedProvider> = Arc::new(ScriptedFeed {
            failing_tokens: vec!["LINK".to_string()],
        });
        let clock: Arc<dyn Clock> = Arc::new(FixedClock(Utc::now()));
        let tokens = vec!["WETH".to_string(), "LINK".to_string(), "UNI".to_string()];

        let batch = scan_multiple_tokens(
            feed,
            clock,
            &tokens,
            &ScanOptions { trade_amount: dec!(1), quote_timeout_secs: None },
            &EngineConfig::default(),
        )
        .await;

        assert_eq!(batch.summary.successful_scans, 2);
        assert_eq!(batch.summary.failed_scans, 1);
        assert_eq!(batch.summary.errors[0].token, "LINK");
    }

    #[tokio::test]
    async fn batch_scan_honors_the_concurrency_limit() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        struct CountingFeed {
            in_flight: AtomicUsize,
            peak: AtomicUsize,
        }

        #[async_trait]
        impl PriceFeedProvider for CountingFeed {
            async fn get_quotes(&self, _token: &str) -> Result<Vec<PriceQuote>> {
                let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                self.peak.fetch_max(current, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(10)).await;
                self.in_flight.fetch_sub(1, Ordering::SeqCst);
                Ok(vec![])
            }
        }

        let feed = Arc::new(CountingFeed {
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        });
        let clock: Arc<dyn Clock> = Arc::new(FixedClock(Utc::now()));
        let tokens: Vec<String> = (0..6).map(|i| format!("TOK{i}")).collect();
        let config = EngineConfig {
            max_scan_concurrency: 2,
            ..EngineConfig::default()
        };

        let batch = scan_multiple_tokens(
            Arc::clone(&feed) as Arc<dyn PriceFeedProvider>,
            clock,
            &tokens,
            &ScanOptions { trade_amount: dec!(1), quote_timeout_secs: None },
            &config,
        )
        .await;

        assert_eq!(batch.summary.successful_scans, 6);
        assert!(feed.peak.load(Ordering::SeqCst) <= 2);
    }

    #[tokio::test]
    async fn stale_and_simulated_quotes_are_filtered() {
        struct MixedFeed;

        #[async_trait]
        impl PriceFeedProvider for MixedFeed {
            async fn get_quotes(&self, _token: &str) -> Result<Vec<PriceQuote>> {
                let now = Utc::now();
                Ok(vec![
                    PriceQuote {
                        venue: "fresh".to_string(),
                        price: dec!(100),
                        fee_rate: dec!(0.003),
                        reliability: dec!(0.9),
                        network: NetworkId::Base,
                        pool: None,
                        source: DataSource::Live,
                        quoted_at: now,
                    },
                    PriceQuote {
                        venue: "stale".to_string(),
                        price: dec!(105),
                        fee_rate: dec!(0.003),
                        reliability: dec!(0.9),
                        network: NetworkId::Base,
                        pool: None,
                        source: DataSource::Live,
                        quoted_at: now - ChronoDuration::seconds(600),
                    },
                    PriceQuote {
                        venue: "synthetic".to_string(),
                        price: dec!(110),
                        fee_rate: dec!(0.003),
                        reliability: dec!(0.9),
                        network: NetworkId::Base,
                        pool: None,
                        source: DataSource::Simulated,
                        quoted_at: now,
                    },
                ])
            }
        }

        let clock = FixedClock(Utc::now());
        let scan = scan_token(&MixedFeed, &clock, "WETH", dec!(1), &EngineConfig::default())
            .await
            .unwrap();
        // only the fresh live quote survives, so no pair exists
        assert_eq!(scan.market_conditions.venue_count, 1);
        assert!(scan.opportunities.is_empty());
    }
}
