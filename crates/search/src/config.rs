//! Search widths and limits.

use rabbit_core::{RabbitError, RabbitResult};
use rabbit_engine::{EngineConfig, PieceRngModel};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Depth-1 candidates expanded with the next piece.
    pub beam_width: usize,
    /// Chains kept after the depth-2 merge.
    pub chain_width: usize,
    /// Candidates kept after the fast evaluation.
    pub eval_width: usize,
    /// Value of a hypothetical line that runs out of placements.
    pub dead_value: f64,
    /// Leading chains that get an expected value.
    pub hypothetical_width: usize,
    pub rng: PieceRngModel,
    pub engine: EngineConfig,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            beam_width: 20,
            chain_width: 3,
            eval_width: 40,
            dead_value: -1000.0,
            hypothetical_width: 3,
            rng: PieceRngModel::standard(),
            engine: EngineConfig::default(),
        }
    }
}

impl SearchConfig {
    pub fn from_json(json: &str) -> RabbitResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> RabbitResult<()> {
        for (name, width) in [
            ("beam_width", self.beam_width),
            ("chain_width", self.chain_width),
            ("eval_width", self.eval_width),
            ("hypothetical_width", self.hypothetical_width),
        ] {
            if width == 0 {
                return Err(RabbitError::Config(format!("{name} must be at least 1")));
            }
        }
        if !self.dead_value.is_finite() {
            return Err(RabbitError::Config("dead_value must be finite".to_string()));
        }
        rabbit_core::ensure_range("well_column", self.engine.well_column as i64, 0, 9)
    }
}
