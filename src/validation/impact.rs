//! Constant-product swap math
//!
//! The single authoritative implementation of the x*y=k output and
//! price-impact formulas. Both the profit calculator and the liquidity
//! validator call into here; there is deliberately no second copy.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use crate::errors::{EngineError, EngineResult};

fn check_positive(field: &'static str, value: Decimal) -> EngineResult<()> {
    if value <= Decimal::ZERO {
        return Err(EngineError::InvalidInput {
            field,
            value,
            reason: "must be positive".to_string(),
        });
    }
    Ok(())
}

fn check_fee_rate(fee_rate: Decimal) -> EngineResult<()> {
    if fee_rate < Decimal::ZERO || fee_rate >= Decimal::ONE {
        return Err(EngineError::InvalidInput {
            field: "fee_rate",
            value: fee_rate,
            reason: "fee rate must be in [0, 1)".to_string(),
        });
    }
    Ok(())
}

/// Output amount of a constant-product swap:
/// `out = (in * (1-fee) * reserve_out) / (reserve_in + in * (1-fee))`.
pub fn swap_output(
    amount_in: Decimal,
    reserve_in: Decimal,
    reserve_out: Decimal,
    fee_rate: Decimal,
) -> EngineResult<Decimal> {
    check_positive("reserve_in", reserve_in)?;
    check_positive("reserve_out", reserve_out)?;
    check_fee_rate(fee_rate)?;
    if amount_in < Decimal::ZERO {
        return Err(EngineError::InvalidInput {
            field: "amount_in",
            value: amount_in,
            reason: "amount must not be negative".to_string(),
        });
    }

    let effective_in = amount_in * (Decimal::ONE - fee_rate);
    Ok((effective_in * reserve_out) / (reserve_in + effective_in))
}

/// Relative shortfall against the zero-size ideal price, in percent.
/// Monotone increasing in `amount_in` and always in [0, 100).
pub fn price_impact(
    amount_in: Decimal,
    reserve_in: Decimal,
    reserve_out: Decimal,
    fee_rate: Decimal,
) -> EngineResult<Decimal> {
    let out = swap_output(amount_in, reserve_in, reserve_out, fee_rate)?;
    if amount_in == Decimal::ZERO {
        return Ok(Decimal::ZERO);
    }

    let ideal_out = amount_in * reserve_out / reserve_in;
    Ok((ideal_out - out) / ideal_out * dec!(100))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn zero_amount_has_zero_impact() {
        let impact = price_impact(dec!(0), dec!(1000), dec!(1000), dec!(0.003)).unwrap();
        assert_eq!(impact, dec!(0));
    }

    #[test]
    fn fee_free_small_trade_has_small_impact() {
        let impact = price_impact(dec!(1), dec!(10000), dec!(10000), dec!(0)).unwrap();
        assert!(impact > dec!(0));
        assert!(impact < dec!(0.02));
    }

    #[test]
    fn rejects_non_positive_reserves() {
        assert!(matches!(
            swap_output(dec!(1), dec!(0), dec!(1000), dec!(0.003)),
            Err(EngineError::InvalidInput { field: "reserve_in", .. })
        ));
        assert!(matches!(
            swap_output(dec!(1), dec!(1000), dec!(-5), dec!(0.003)),
            Err(EngineError::InvalidInput { field: "reserve_out", .. })
        ));
    }

    #[test]
    fn rejects_fee_of_one_or_more() {
        assert!(price_impact(dec!(1), dec!(100), dec!(100), dec!(1)).is_err());
        assert!(price_impact(dec!(1), dec!(100), dec!(100), dec!(-0.01)).is_err());
    }

    #[test]
    fn half_pool_trade_impact_matches_closed_form() {
        // in = reserve_in, no fee: out = ro/2, ideal = ro, impact = 50%
        let impact = price_impact(dec!(1000), dec!(1000), dec!(500), dec!(0)).unwrap();
        assert_eq!(impact.round_dp(6), dec!(50));
    }

    proptest! {
        #[test]
        fn impact_is_bounded(
            amount in 0.0001f64..1_000_000.0,
            reserve_in in 1.0f64..10_000_000.0,
            reserve_out in 1.0f64..10_000_000.0,
        ) {
            let a = Decimal::from_f64_retain(amount).unwrap();
            let ri = Decimal::from_f64_retain(reserve_in).unwrap();
            let ro = Decimal::from_f64_retain(reserve_out).unwrap();
            let impact = price_impact(a, ri, ro, dec!(0.003)).unwrap();
            prop_assert!(impact >= dec!(0));
            prop_assert!(impact < dec!(100));
        }

        #[test]
        fn impact_is_monotone_in_amount(
            amount in 0.001f64..100_000.0,
            reserve in 10.0f64..10_000_000.0,
        ) {
            let a = Decimal::from_f64_retain(amount).unwrap();
            let r = Decimal::from_f64_retain(reserve).unwrap();
            let smaller = price_impact(a, r, r, dec!(0.003)).unwrap();
            let larger = price_impact(a * dec!(2), r, r, dec!(0.003)).unwrap();
            prop_assert!(larger >= smaller);
        }
    }
}
