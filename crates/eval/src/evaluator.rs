//! Two-tier board evaluation: a fast tier to rank a large candidate pool,
//! and the full factor set for the survivors.

use std::fmt::Write as _;

use rabbit_core::{InputTimeline, Piece, Possibility, RabbitError, RabbitResult};
use rabbit_engine::{can_do_placement, EngineConfig, GravitySystem};
use tracing::trace;

use crate::features::{
    adjusted_holes, average_height, built_out_left, built_out_right, cells_below_col_9, is_tetris_ready,
    level_after_placement, lines_needed_until_clean, spire_height, well_cells, well_coverage,
};
use crate::mode::AiMode;
use crate::params::AiParams;
use crate::rank::{correct_for_extreme_gaps, SurfaceRater};
use crate::tap::TapHeights;

/// Per-request data every evaluation shares.
#[derive(Clone, Debug)]
pub struct EvalContext {
    pub rater: SurfaceRater,
    pub taps: TapHeights,
    pub timeline: InputTimeline,
    pub gravity: GravitySystem,
    pub well: usize,
}

impl EvalContext {
    pub fn new(rater: SurfaceRater, timeline: InputTimeline, engine: &EngineConfig) -> Self {
        let taps = TapHeights::compute(&timeline, engine.gravity);
        Self {
            rater,
            taps,
            timeline,
            gravity: engine.gravity,
            well: engine.well_column,
        }
    }
}

/// A scored placement with every named factor that went into it.
#[derive(Clone, Debug, PartialEq)]
pub struct Evaluation {
    pub value: f64,
    pub factors: Vec<(&'static str, f64)>,
}

impl Evaluation {
    fn from_factors(factors: Vec<(&'static str, f64)>) -> RabbitResult<Self> {
        let mut value = 0.0;
        for &(name, v) in &factors {
            if v.is_nan() {
                return Err(RabbitError::NanFactor(name));
            }
            value += v;
        }
        Ok(Self { value, factors })
    }

    pub fn factor(&self, name: &str) -> Option<f64> {
        self.factors.iter().find(|(n, _)| *n == name).map(|&(_, v)| v)
    }

    /// `name: 1.23, ..., SUBTOTAL: total`
    pub fn explanation(&self) -> String {
        let mut out = String::new();
        for (name, v) in &self.factors {
            let _ = write!(out, "{name}: {v:.2}, ");
        }
        let _ = write!(out, "SUBTOTAL: {}", self.value);
        out
    }
}

/// Value of the clear itself: a bonus for a tetris, a cost per burned line.
pub fn line_clear_value(lines_cleared: u8, params: &AiParams) -> f64 {
    match lines_cleared {
        0 => 0.0,
        4 => params.tetris_bonus,
        n => params.burn_coef * n as f64,
    }
}

pub fn scare_height(level_after: u32, params: &AiParams) -> f64 {
    if level_after >= 29 {
        params.scare_height_29
    } else if level_after >= 19 {
        params.scare_height_19
    } else {
        params.scare_height_18
    }
}

/// Scores placements with one mode's params.
#[derive(Clone, Debug)]
pub struct Evaluator<'a> {
    pub ctx: &'a EvalContext,
    pub params: AiParams,
}

impl<'a> Evaluator<'a> {
    pub fn new(ctx: &'a EvalContext, params: AiParams) -> Self {
        Self { ctx, params }
    }

    /// Cheap factors only, for truncating the candidate pool.
    pub fn fast_eval(&self, possibility: &Possibility, level: u32, lines: u32, mode: AiMode) -> RabbitResult<f64> {
        let factors = self.fast_factors(possibility, level, lines, mode);
        Ok(Evaluation::from_factors(factors)?.value)
    }

    pub fn evaluate(
        &self,
        possibility: &Possibility,
        level: u32,
        lines: u32,
        mode: AiMode,
        next: Option<Piece>,
    ) -> RabbitResult<Evaluation> {
        let mut factors = self.fast_factors(possibility, level, lines, mode);
        self.extend_full_factors(&mut factors, possibility, level, lines, mode, next);
        let evaluation = Evaluation::from_factors(factors)?;
        trace!(
            placement = ?possibility.placement,
            %mode,
            value = evaluation.value,
            "evaluated placement"
        );
        Ok(evaluation)
    }

    fn fast_factors(&self, possibility: &Possibility, level: u32, lines: u32, mode: AiMode) -> Vec<(&'static str, f64)> {
        let p = &self.params;
        let surface = possibility.surface.without_well(self.ctx.well);
        let (corrected, excess) = correct_for_extreme_gaps(&surface);
        let level_after = level_after_placement(level, lines, possibility.lines_cleared);
        let scare = scare_height(level_after, p);
        let holes = adjusted_holes(
            &possibility.board_after,
            &possibility.surface,
            p.tuck_setup_hole_proportion,
            mode == AiMode::Endgame,
        );
        let avg_above_scare = (average_height(&surface) - scare).max(0.0);

        vec![
            ("surface", p.surface_coef * self.ctx.rater.rate(&corrected)),
            ("extreme_gap", excess as f64 * p.extreme_gap_coef),
            ("hole", holes * p.hole_coef),
            ("line_clear", line_clear_value(possibility.lines_cleared, p)),
            (
                "spire_height",
                p.spire_height_coef * spire_height(&surface, scare).powf(p.spire_height_exponent),
            ),
            ("avg_height", p.avg_height_coef * avg_above_scare.powf(p.avg_height_exponent)),
            ("input_cost", p.input_cost_coef * possibility.input_cost),
        ]
    }

    fn extend_full_factors(
        &self,
        factors: &mut Vec<(&'static str, f64)>,
        possibility: &Possibility,
        level: u32,
        lines: u32,
        mode: AiMode,
        next: Option<Piece>,
    ) {
        let p = &self.params;
        let well = self.ctx.well;
        let board = &possibility.board_after;
        let surface = possibility.surface.without_well(well);
        let level_after = level_after_placement(level, lines, possibility.lines_cleared);
        let scare = scare_height(level_after, p);

        let tetris_ready = if !is_tetris_ready(board, well) {
            0.0
        } else if next == Some(Piece::I) {
            p.tetris_ready_bonus_bar_next
        } else {
            p.tetris_ready_bonus
        };

        factors.extend([
            ("hole_weight", lines_needed_until_clean(board, well) as f64 * p.hole_weight_coef),
            ("col_10", well_coverage(board, well, scare) * p.col_10_coef),
            ("col_10_burn", well_cells(board, well) as f64 * p.burn_coef),
            ("col_9", p.high_col_9_coef * cells_below_col_9(&surface) as f64),
            ("tetris_ready", tetris_ready),
            (
                "built_out_left",
                p.built_out_left_coef * built_out_left(&possibility.surface, scare),
            ),
            (
                "built_out_right",
                p.built_out_right_coef * built_out_right(board, &possibility.surface, scare),
            ),
            (
                "inaccessible_left",
                if self.left_inaccessible(possibility, level_after, mode) {
                    p.inaccessible_left_coef
                } else {
                    0.0
                },
            ),
            (
                "inaccessible_right",
                if self.right_inaccessible(possibility, level_after) {
                    p.inaccessible_right_coef
                } else {
                    0.0
                },
            ),
        ]);
    }

    fn can_reach(&self, possibility: &Possibility, level: u32, piece: Piece, rotation: u8, x_offset: i8) -> bool {
        can_do_placement(
            &possibility.board_after,
            level,
            piece,
            rotation,
            x_offset,
            &self.ctx.timeline,
            self.ctx.gravity,
        )
    }

    /// The left edge is neither built up past tap reach nor reachable.
    fn left_inaccessible(&self, possibility: &Possibility, level: u32, mode: AiMode) -> bool {
        let heights = &possibility.surface.heights;
        let (h0, h1) = (heights[0] as i8, heights[1] as i8);
        if mode == AiMode::Endgame {
            if h0 >= h1 && h0 > self.ctx.taps.max_4_tap(level) {
                return false;
            }
            return !self.can_reach(possibility, level, Piece::L, 0, -4);
        }
        if h0 >= h1 && h0 > self.ctx.taps.max_5_tap(level) {
            return false;
        }
        !self.can_reach(possibility, level, Piece::I, 1, -5)
    }

    fn right_inaccessible(&self, possibility: &Possibility, level: u32) -> bool {
        let heights = &possibility.surface.heights;
        let (h8, h9) = (heights[8] as i8, heights[9] as i8);
        if h9 >= h8 && h9 > self.ctx.taps.max_4_tap(level) {
            return false;
        }
        !self.can_reach(possibility, level, Piece::I, 1, 4)
    }
}
