//! Evaluation coefficients and the per-mode patches applied on top of them.

use std::collections::BTreeMap;

use rabbit_core::{RabbitError, RabbitResult};
use serde::{Deserialize, Serialize};

use crate::mode::AiMode;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", default)]
pub struct AiParams {
    pub avg_height_exponent: f64,
    pub avg_height_coef: f64,
    pub burn_coef: f64,
    pub col_10_coef: f64,
    pub max_dirty_tetris_height: f64,
    pub extreme_gap_coef: f64,
    pub built_out_left_coef: f64,
    pub built_out_right_coef: f64,
    pub hole_coef: f64,
    pub hole_weight_coef: f64,
    pub spire_height_exponent: f64,
    pub spire_height_coef: f64,
    pub scare_height_18: f64,
    pub scare_height_19: f64,
    pub scare_height_29: f64,
    pub scare_height_offset: f64,
    pub high_col_9_coef: f64,
    pub surface_coef: f64,
    pub tetris_bonus: f64,
    pub tetris_ready_bonus: f64,
    pub tetris_ready_bonus_bar_next: f64,
    pub inaccessible_left_coef: f64,
    pub inaccessible_right_coef: f64,
    pub tuck_setup_hole_proportion: f64,
    pub input_cost_coef: f64,
    /// Never dig, never take risks for burns.
    pub play_perfect: bool,
}

impl Default for AiParams {
    fn default() -> Self {
        Self {
            avg_height_exponent: 1.1556,
            avg_height_coef: -10.50624,
            burn_coef: -2.2,
            col_10_coef: -4.0,
            max_dirty_tetris_height: 0.2,
            extreme_gap_coef: -1.6416,
            built_out_left_coef: 0.5,
            built_out_right_coef: 0.0,
            hole_coef: -19.8,
            hole_weight_coef: 0.0,
            spire_height_exponent: 1.216,
            spire_height_coef: -1.1556,
            scare_height_18: 10.032,
            scare_height_19: 5.58,
            scare_height_29: 0.0,
            scare_height_offset: -2.0,
            high_col_9_coef: -0.249744,
            surface_coef: 0.27392,
            tetris_bonus: 28.248,
            tetris_ready_bonus: 5.90976,
            tetris_ready_bonus_bar_next: 15.36,
            inaccessible_left_coef: -30.0,
            inaccessible_right_coef: -200.0,
            tuck_setup_hole_proportion: 0.81,
            input_cost_coef: 1.0,
            play_perfect: false,
        }
    }
}

impl AiParams {
    pub fn from_json(json: &str) -> RabbitResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Mutable access to a coefficient by its serialized name.
    fn field_mut(&mut self, name: &str) -> Option<&mut f64> {
        let field = match name {
            "AVG_HEIGHT_EXPONENT" => &mut self.avg_height_exponent,
            "AVG_HEIGHT_COEF" => &mut self.avg_height_coef,
            "BURN_COEF" => &mut self.burn_coef,
            "COL_10_COEF" => &mut self.col_10_coef,
            "MAX_DIRTY_TETRIS_HEIGHT" => &mut self.max_dirty_tetris_height,
            "EXTREME_GAP_COEF" => &mut self.extreme_gap_coef,
            "BUILT_OUT_LEFT_COEF" => &mut self.built_out_left_coef,
            "BUILT_OUT_RIGHT_COEF" => &mut self.built_out_right_coef,
            "HOLE_COEF" => &mut self.hole_coef,
            "HOLE_WEIGHT_COEF" => &mut self.hole_weight_coef,
            "SPIRE_HEIGHT_EXPONENT" => &mut self.spire_height_exponent,
            "SPIRE_HEIGHT_COEF" => &mut self.spire_height_coef,
            "SCARE_HEIGHT_18" => &mut self.scare_height_18,
            "SCARE_HEIGHT_19" => &mut self.scare_height_19,
            "SCARE_HEIGHT_29" => &mut self.scare_height_29,
            "SCARE_HEIGHT_OFFSET" => &mut self.scare_height_offset,
            "HIGH_COL_9_COEF" => &mut self.high_col_9_coef,
            "SURFACE_COEF" => &mut self.surface_coef,
            "TETRIS_BONUS" => &mut self.tetris_bonus,
            "TETRIS_READY_BONUS" => &mut self.tetris_ready_bonus,
            "TETRIS_READY_BONUS_BAR_NEXT" => &mut self.tetris_ready_bonus_bar_next,
            "INACCESSIBLE_LEFT_COEF" => &mut self.inaccessible_left_coef,
            "INACCESSIBLE_RIGHT_COEF" => &mut self.inaccessible_right_coef,
            "TUCK_SETUP_HOLE_PROPORTION" => &mut self.tuck_setup_hole_proportion,
            "INPUT_COST_COEF" => &mut self.input_cost_coef,
            _ => return None,
        };
        Some(field)
    }
}

/// One patch entry: a bare number overrides, `{"add": x}` shifts.
#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamEdit {
    Set(f64),
    Add { add: f64 },
}

/// Named edits applied to a copy of the base params.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParamPatch {
    pub edits: BTreeMap<String, ParamEdit>,
}

impl ParamPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, name: &str, value: f64) -> Self {
        self.edits.insert(name.to_string(), ParamEdit::Set(value));
        self
    }

    pub fn add(mut self, name: &str, delta: f64) -> Self {
        self.edits.insert(name.to_string(), ParamEdit::Add { add: delta });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    pub fn apply(&self, base: &AiParams) -> RabbitResult<AiParams> {
        let mut params = base.clone();
        for (name, edit) in &self.edits {
            let field = params
                .field_mut(name)
                .ok_or_else(|| RabbitError::UnknownParam(name.clone()))?;
            match *edit {
                ParamEdit::Set(value) => *field = value,
                ParamEdit::Add { add } => *field += add,
            }
        }
        Ok(params)
    }
}

/// A patch for every mode other than standard play.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", default)]
pub struct ParamMods {
    pub dig: ParamPatch,
    pub near_endgame: ParamPatch,
    pub endgame: ParamPatch,
    pub endgame_for_max_clears: ParamPatch,
    pub imminent_death: ParamPatch,
}

impl Default for ParamMods {
    fn default() -> Self {
        Self {
            dig: ParamPatch::new()
                .set("BURN_COEF", 0.0)
                .set("COL_10_COEF", -2.0)
                .set("HOLE_WEIGHT_COEF", -3.0)
                .set("HOLE_COEF", -100.0)
                .set("SURFACE_COEF", 0.2),
            near_endgame: ParamPatch::new()
                .set("BURN_COEF", -15.0)
                .set("TETRIS_READY_BONUS", 10.0),
            endgame: ParamPatch::new()
                .set("COL_10_COEF", 0.0)
                .set("BUILT_OUT_LEFT_COEF", 6.0)
                .set("BUILT_OUT_RIGHT_COEF", 2.0)
                .set("AVG_HEIGHT_COEF", -8.0)
                .set("HOLE_COEF", -20.0)
                .set("BURN_COEF", 0.0)
                .set("INACCESSIBLE_LEFT_COEF", -100.0)
                .set("INACCESSIBLE_RIGHT_COEF", -50.0)
                .set("HIGH_COL_9_COEF", 0.0),
            endgame_for_max_clears: ParamPatch::new(),
            imminent_death: ParamPatch::new()
                .set("BURN_COEF", 1.0)
                .set("TETRIS_READY_BONUS", 0.0)
                .set("HOLE_COEF", -40.0),
        }
    }
}

impl ParamMods {
    /// Parses and checks every patch against the known names.
    pub fn from_json(json: &str) -> RabbitResult<Self> {
        let mods: ParamMods = serde_json::from_str(json)?;
        let base = AiParams::default();
        for mode in AiMode::ALL {
            if let Some(patch) = mods.patch_for(mode) {
                patch.apply(&base)?;
            }
        }
        Ok(mods)
    }

    pub fn patch_for(&self, mode: AiMode) -> Option<&ParamPatch> {
        match mode {
            AiMode::Standard => None,
            AiMode::Dig => Some(&self.dig),
            AiMode::NearEndgame => Some(&self.near_endgame),
            AiMode::Endgame => Some(&self.endgame),
            AiMode::EndgameForMaxClears => Some(&self.endgame_for_max_clears),
            AiMode::ImminentDeath => Some(&self.imminent_death),
        }
    }

    /// `base` with the patch for `mode` applied.
    pub fn params_for(&self, mode: AiMode, base: &AiParams) -> RabbitResult<AiParams> {
        match self.patch_for(mode) {
            Some(patch) => patch.apply(base),
            None => Ok(base.clone()),
        }
    }
}
