//! Engine health and stats types

use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ComponentHealth {
    pub calculator: bool,
    pub liquidity_validator: bool,
    pub gas_estimator: bool,
    pub scanner: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct EngineStats {
    pub version: String,
    pub component_health: ComponentHealth,
    pub last_updated: DateTime<Utc>,
}
