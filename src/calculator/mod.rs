//! Pure numeric primitives: spread, profit, risk
//!
//! Everything in this module is a pure function over its arguments. No
//! internal state, no clocks, no I/O; concurrent callers need no locks.

pub mod profit;
pub mod risk;
pub mod spread;

pub use profit::*;
pub use risk::*;
pub use spread::*;

// Price impact lives with the liquidity validator; re-exported here so the
// calculator surface is complete without a second implementation.
pub use crate::validation::impact::{price_impact, swap_output};
