//! Opportunity detection over a set of quotes

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use crate::calculator::spread;
use crate::config::EngineConfig;
use crate::errors::EngineResult;
use crate::types::{ArbitrageCandidate, MarketConditions, PriceQuote, SpreadDirection};

/// Pairwise comparison of every venue quoting the same token. A pair
/// survives only if its spread covers both venues' fees plus the
/// configured margin. Results are ordered by net spread descending, ties
/// broken by combined venue reliability.
pub fn detect_opportunities(
    token: &str,
    quotes: &[PriceQuote],
    trade_amount: Decimal,
    config: &EngineConfig,
    now: DateTime<Utc>,
) -> EngineResult<Vec<ArbitrageCandidate>> {
    let mut candidates = Vec::new();

    for i in 0..quotes.len() {
        for j in (i + 1)..quotes.len() {
            let first = &quotes[i];
            let second = &quotes[j];

            let observed = spread(first.price, second.price)?;
            let (buy, sell) = match observed.direction {
                SpreadDirection::BuyFirstSellSecond => (first, second),
                SpreadDirection::BuySecondSellFirst => (second, first),
                SpreadDirection::Flat => continue,
            };

            let fee_hurdle_pct = buy.fee_pct() + sell.fee_pct();
            if observed.pct <= fee_hurdle_pct + config.min_spread_margin_pct {
                continue;
            }

            candidates.push(ArbitrageCandidate::new(
                token.to_string(),
                buy.clone(),
                sell.clone(),
                trade_amount,
                observed.pct,
                observed.pct - fee_hurdle_pct,
                now,
            )?);
        }
    }

    candidates.sort_by(|a, b| {
        b.net_spread_pct()
            .cmp(&a.net_spread_pct())
            .then(b.combined_reliability().cmp(&a.combined_reliability()))
    });

    Ok(candidates)
}

/// Aggregate view of the quote set a scan worked from.
pub fn summarize_market(quotes: &[PriceQuote], candidates: &[ArbitrageCandidate]) -> MarketConditions {
    let venue_count = quotes.len();

    let (best, sum) = candidates.iter().fold(
        (Decimal::ZERO, Decimal::ZERO),
        |(best, sum), c| (best.max(c.spread_pct()), sum + c.spread_pct()),
    );
    let mean_spread_pct = if candidates.is_empty() {
        Decimal::ZERO
    } else {
        sum / Decimal::from(candidates.len())
    };

    let price_dispersion_pct = match (
        quotes.iter().map(|q| q.price).filter(|p| *p > Decimal::ZERO).min(),
        quotes.iter().map(|q| q.price).max(),
    ) {
        (Some(min), Some(max)) if min > Decimal::ZERO => (max / min - Decimal::ONE) * dec!(100),
        _ => Decimal::ZERO,
    };

    let mean_reliability = if quotes.is_empty() {
        Decimal::ZERO
    } else {
        quotes.iter().map(|q| q.reliability).sum::<Decimal>() / Decimal::from(quotes.len())
    };

    MarketConditions {
        venue_count,
        best_spread_pct: best,
        mean_spread_pct,
        price_dispersion_pct,
        mean_reliability,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DataSource, NetworkId};

    fn quote(venue: &str, price: Decimal, fee_rate: Decimal, reliability: Decimal) -> PriceQuote {
        PriceQuote {
            venue: venue.to_string(),
            price,
            fee_rate,
            reliability,
            network: NetworkId::Base,
            pool: None,
            source: DataSource::Live,
            quoted_at: Utc::now(),
        }
    }

    #[test]
    fn wide_spread_is_detected_with_correct_legs() {
        let quotes = vec![
            quote("venue-a", dec!(100), dec!(0.003), dec!(0.9)),
            quote("venue-b", dec!(103), dec!(0.003), dec!(0.8)),
        ];
        let found =
            detect_opportunities("WETH", &quotes, dec!(1), &EngineConfig::default(), Utc::now())
                .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].buy.venue, "venue-a");
        assert_eq!(found[0].sell.venue, "venue-b");
        assert_eq!(found[0].spread_pct(), dec!(3));
        // 3% minus 0.3% + 0.3% of fees
        assert_eq!(found[0].net_spread_pct(), dec!(2.4));
    }

    #[test]
    fn spread_inside_fees_plus_margin_is_dropped() {
        // 0.5% spread vs 0.3% + 0.3% fees: under water before the margin
        let quotes = vec![
            quote("venue-a", dec!(100), dec!(0.003), dec!(0.9)),
            quote("venue-b", dec!(100.5), dec!(0.003), dec!(0.9)),
        ];
        let found =
            detect_opportunities("WETH", &quotes, dec!(1), &EngineConfig::default(), Utc::now())
                .unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn results_are_ordered_by_net_spread_then_reliability() {
        let quotes = vec![
            quote("a", dec!(100), dec!(0.001), dec!(0.9)),
            quote("b", dec!(102), dec!(0.001), dec!(0.9)),
            quote("c", dec!(105), dec!(0.001), dec!(0.7)),
        ];
        let found =
            detect_opportunities("WETH", &quotes, dec!(1), &EngineConfig::default(), Utc::now())
                .unwrap();
        assert_eq!(found.len(), 3);
        // a->c is the widest spread, then b->c, then a->b
        assert!(found[0].net_spread_pct() >= found[1].net_spread_pct());
        assert!(found[1].net_spread_pct() >= found[2].net_spread_pct());
        assert_eq!(found[0].buy.venue, "a");
        assert_eq!(found[0].sell.venue, "c");
    }

    #[test]
    fn empty_quote_set_is_a_valid_empty_result() {
        let found =
            detect_opportunities("WETH", &[], dec!(1), &EngineConfig::default(), Utc::now())
                .unwrap();
        assert!(found.is_empty());

        let conditions = summarize_market(&[], &found);
        assert_eq!(conditions.venue_count, 0);
        assert_eq!(conditions.best_spread_pct, dec!(0));
    }

    #[test]
    fn market_summary_reflects_dispersion() {
        let quotes = vec![
            quote("a", dec!(100), dec!(0.003), dec!(1)),
            quote("b", dec!(110), dec!(0.003), dec!(0.5)),
        ];
        let conditions = summarize_market(&quotes, &[]);
        assert_eq!(conditions.price_dispersion_pct, dec!(10));
        assert_eq!(conditions.mean_reliability, dec!(0.75));
    }
}
