//! Engine-level settings shared by every placement search.

use rabbit_core::{RabbitResult, DEFAULT_WELL_COLUMN};
use serde::{Deserialize, Serialize};

use crate::gravity::GravitySystem;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub gravity: GravitySystem,
    /// Column excluded from hole counting.
    pub well_column: usize,
    /// Search for tucks and spins after the tap placements lock.
    pub tucks_enabled: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            gravity: GravitySystem::Ntsc,
            well_column: DEFAULT_WELL_COLUMN,
            tucks_enabled: true,
        }
    }
}

impl EngineConfig {
    pub fn pal() -> Self {
        Self {
            gravity: GravitySystem::Pal,
            ..Self::default()
        }
    }

    /// Taps only, no in-air adjustments.
    pub fn tap_only() -> Self {
        Self {
            tucks_enabled: false,
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> RabbitResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        rabbit_core::ensure_range("well_column", config.well_column as i64, 0, 9)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = EngineConfig::from_json(r#"{"gravity": "Pal"}"#).expect("valid config");
        assert_eq!(config.gravity, GravitySystem::Pal);
        assert_eq!(config.well_column, DEFAULT_WELL_COLUMN);
        assert!(config.tucks_enabled);
    }

    #[test]
    fn test_rejects_bad_well() {
        assert!(EngineConfig::from_json(r#"{"well_column": 12}"#).is_err());
        assert!(EngineConfig::from_json("not json").is_err());
    }
}
