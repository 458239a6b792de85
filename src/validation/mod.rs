//! Liquidity validation and AMM swap math

pub mod impact;
pub mod liquidity;

pub use impact::*;
pub use liquidity::*;
