//! Rabbit eval crate - board heuristics, tunable params and strategy modes.

pub mod evaluator;
pub mod features;
pub mod mode;
pub mod params;
pub mod rank;
pub mod tap;

pub use evaluator::{line_clear_value, scare_height, EvalContext, Evaluation, Evaluator};
pub use features::level_after_placement;
pub use mode::{select_mode, AiMode, ModeInputs};
pub use params::{AiParams, ParamEdit, ParamMods, ParamPatch};
pub use rank::{correct_for_extreme_gaps, surface_index, RankTable, SurfaceRater, RANK_TABLE_ENTRIES};
pub use tap::TapHeights;
