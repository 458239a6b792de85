//! Cross-venue spread calculation

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use crate::errors::{EngineError, EngineResult};
use crate::types::{Spread, SpreadDirection};

/// Relative price difference between two venues quoting the same asset,
/// measured over the cheaper price. Symmetric in magnitude:
/// `spread(a, b)` and `spread(b, a)` differ only in direction.
pub fn spread(price_a: Decimal, price_b: Decimal) -> EngineResult<Spread> {
    for (field, price) in [("price_a", price_a), ("price_b", price_b)] {
        if price <= Decimal::ZERO {
            return Err(EngineError::InvalidInput {
                field,
                value: price,
                reason: "price must be positive".to_string(),
            });
        }
    }

    let direction = if price_a < price_b {
        SpreadDirection::BuyFirstSellSecond
    } else if price_b < price_a {
        SpreadDirection::BuySecondSellFirst
    } else {
        SpreadDirection::Flat
    };

    let pct = (price_b - price_a).abs() / price_a.min(price_b) * dec!(100);

    Ok(Spread { pct, direction })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn equal_prices_are_flat() {
        let s = spread(dec!(100), dec!(100)).unwrap();
        assert_eq!(s.pct, dec!(0));
        assert_eq!(s.direction, SpreadDirection::Flat);
    }

    #[test]
    fn direction_points_at_cheaper_venue() {
        let s = spread(dec!(100), dec!(105)).unwrap();
        assert_eq!(s.direction, SpreadDirection::BuyFirstSellSecond);
        assert_eq!(s.pct, dec!(5));

        let s = spread(dec!(105), dec!(100)).unwrap();
        assert_eq!(s.direction, SpreadDirection::BuySecondSellFirst);
        assert_eq!(s.pct, dec!(5));
    }

    #[test]
    fn rejects_non_positive_prices() {
        assert!(spread(dec!(0), dec!(100)).is_err());
        assert!(spread(dec!(100), dec!(-1)).is_err());
    }

    proptest! {
        #[test]
        fn magnitude_is_symmetric(a in 0.0001f64..1_000_000.0, b in 0.0001f64..1_000_000.0) {
            let a = Decimal::from_f64_retain(a).unwrap();
            let b = Decimal::from_f64_retain(b).unwrap();
            let forward = spread(a, b).unwrap();
            let reverse = spread(b, a).unwrap();
            prop_assert_eq!(forward.pct, reverse.pct);
        }
    }
}
