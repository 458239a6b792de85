//! Error handling for the analysis engine

pub mod engine_error;

pub use engine_error::*;
