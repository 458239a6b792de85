//! Opportunity scanning across tokens and venues

pub mod detector;
pub mod scan;

pub use detector::*;
pub use scan::*;
