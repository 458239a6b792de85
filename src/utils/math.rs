//! Mathematical utility functions

use rust_decimal::prelude::*;
use rust_decimal_macros::dec;

/// Decimal places used for every monetary figure the engine emits.
/// One shared precision keeps cross-component comparisons
/// (profit vs cost vs floor) stable.
pub const USD_PRECISION: u32 = 6;

pub fn pow10(n: i32) -> Decimal {
    match n {
        0 => dec!(1),
        6 => dec!(1_000_000),
        18 => dec!(1_000_000_000_000_000_000),
        _ => {
            let mut result = dec!(1);
            if n > 0 {
                for _ in 0..n {
                    result *= dec!(10);
                }
            } else {
                for _ in 0..(-n) {
                    result /= dec!(10);
                }
            }
            result
        }
    }
}

/// Round a USD amount to the engine-wide precision.
pub fn round_usd(value: Decimal) -> Decimal {
    value.round_dp(USD_PRECISION)
}

/// Clamp a ratio-style score into [0, 1].
pub fn clamp_unit(value: Decimal) -> Decimal {
    value.max(Decimal::ZERO).min(Decimal::ONE)
}
