//! Gas cost estimation and execution strategy optimization

pub mod estimator;
pub mod strategy;
pub mod tables;

pub use estimator::*;
pub use strategy::*;
pub use tables::*;
