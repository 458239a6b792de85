//! Engine facade

pub mod analyzer;

pub use analyzer::*;
