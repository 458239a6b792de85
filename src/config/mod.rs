//! Configuration management for the analysis engine
//!
//! There is deliberately no process-wide config singleton: the host builds
//! an [`EngineConfig`] (programmatically or via [`EngineConfig::load`]) and
//! hands it to `Engine::new`.

pub mod settings;

pub use settings::*;
