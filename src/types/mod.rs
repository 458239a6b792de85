//! Core data types and structures

pub mod arbitrage;
pub mod costs;
pub mod gas;
pub mod health;
pub mod pools;
pub mod quotes;
pub mod risk;
pub mod scan;

pub use arbitrage::*;
pub use costs::*;
pub use gas::*;
pub use health::*;
pub use pools::*;
pub use quotes::*;
pub use risk::*;
pub use scan::*;
