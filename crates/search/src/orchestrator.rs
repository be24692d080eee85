//! Placement search: depth 1, depth 2 with the next piece, then optional
//! expected-value lookahead over unknown pieces.

use std::cmp::Ordering;

use rabbit_core::{ensure_range, Board, InputTimeline, Piece, Possibility, RabbitError, RabbitResult, SearchState};
use rabbit_engine::{enumerate_placements, PlacementRequest};
use rabbit_eval::{
    level_after_placement, line_clear_value, select_mode, AiMode, AiParams, EvalContext, Evaluation, Evaluator,
    ModeInputs, ParamMods, SurfaceRater,
};
use tracing::debug;

use crate::chain::PossibilityChain;
use crate::config::SearchConfig;
use crate::hypothetical::expected_value;

/// A fully evaluated depth-1 placement.
#[derive(Clone, Debug)]
pub struct Candidate {
    pub possibility: Possibility,
    pub evaluation: Evaluation,
    /// Line-clear value under the mode's params.
    pub partial_value: f64,
}

impl Candidate {
    pub fn into_chain(self) -> PossibilityChain {
        let explanation = self.evaluation.explanation();
        PossibilityChain::single(self.possibility, self.partial_value, self.evaluation.value, explanation)
    }
}

/// Sorted depth-1 candidates and the mode they were scored in.
#[derive(Clone, Debug)]
pub struct Depth1 {
    pub mode: AiMode,
    pub candidates: Vec<Candidate>,
}

#[derive(Clone, Debug)]
pub struct SearchOutcome {
    pub mode: AiMode,
    /// Best first.
    pub chains: Vec<PossibilityChain>,
    /// Depth-2 chains cut by the chain width, kept for reuse.
    pub pruned: Vec<PossibilityChain>,
}

pub struct SearchOrchestrator {
    rater: SurfaceRater,
    config: SearchConfig,
}

impl SearchOrchestrator {
    pub fn new(rater: SurfaceRater, config: SearchConfig) -> RabbitResult<Self> {
        config.validate()?;
        Ok(Self { rater, config })
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Per-request evaluation data; tap tables depend on the timeline.
    pub fn context(&self, timeline: &InputTimeline) -> EvalContext {
        EvalContext::new(self.rater.clone(), timeline.clone(), &self.config.engine)
    }

    /// The best chain, or `None` when the piece has no legal placement.
    pub fn best_move(
        &self,
        state: &SearchState,
        params: &AiParams,
        mods: &ParamMods,
        depth: u8,
        hypothetical: u8,
    ) -> RabbitResult<Option<PossibilityChain>> {
        let outcome = self.search(state, params, mods, depth, hypothetical)?;
        Ok(outcome.chains.into_iter().next())
    }

    pub fn search(
        &self,
        state: &SearchState,
        params: &AiParams,
        mods: &ParamMods,
        depth: u8,
        hypothetical: u8,
    ) -> RabbitResult<SearchOutcome> {
        state.validate()?;
        ensure_range("depth", depth as i64, 1, 2)?;
        ensure_range("hypothetical_depth", hypothetical as i64, 0, 4)?;

        let ctx = self.context(&state.timeline);
        let request = PlacementRequest::from_state(state);
        let first = self.search_depth_1(&ctx, &state.board, &request, state.lines, state.next_piece, params, mods)?;
        let mode = first.mode;
        if first.candidates.is_empty() {
            debug!(piece = %state.piece, %mode, "no legal placement");
            return Ok(SearchOutcome {
                mode,
                chains: Vec::new(),
                pruned: Vec::new(),
            });
        }

        let (mut chains, pruned) = match (depth, state.next_piece) {
            (2, Some(next)) => self.expand_with_next(&ctx, state, next, first.candidates, params, mods)?,
            _ => (first.candidates.into_iter().map(Candidate::into_chain).collect(), Vec::new()),
        };

        if hypothetical > 0 {
            let width = self.config.hypothetical_width.min(chains.len());
            for chain in &mut chains[..width] {
                let (ev, outcomes) = expected_value(self, &ctx, state, chain, hypothetical, params, mods)?;
                chain.expected_value = Some(ev);
                chain.outcomes = outcomes;
            }
            chains[..width].sort_by(|a, b| score_cmp(a.score(), b.score()));
            debug!(width, hypothetical, best = chains[0].score(), "expected values computed");
        }

        Ok(SearchOutcome { mode, chains, pruned })
    }

    /// Mode selection, enumeration, fast truncation, then full evaluation.
    #[allow(clippy::too_many_arguments)]
    pub fn search_depth_1(
        &self,
        ctx: &EvalContext,
        board: &Board,
        request: &PlacementRequest,
        lines: u32,
        next: Option<Piece>,
        params: &AiParams,
        mods: &ParamMods,
    ) -> RabbitResult<Depth1> {
        let level = request.level;
        let mode = select_mode(&ModeInputs {
            board,
            lines,
            level,
            piece: request.piece,
            taps: &ctx.taps,
            params,
            well: ctx.well,
        });
        let evaluator = Evaluator::new(ctx, mods.params_for(mode, params)?);

        let possibilities = enumerate_placements(board, request, &self.config.engine)?;
        if possibilities.is_empty() {
            return Ok(Depth1 {
                mode,
                candidates: Vec::new(),
            });
        }
        let pool_size = possibilities.len();

        let mut ranked = possibilities
            .into_iter()
            .map(|p| Ok((evaluator.fast_eval(&p, level, lines, mode)?, p)))
            .collect::<RabbitResult<Vec<_>>>()?;
        ranked.sort_by(|a, b| score_cmp(a.0, b.0));
        ranked.truncate(self.config.eval_width);
        if ranked.is_empty() {
            return Err(RabbitError::Invariant(format!(
                "fast truncation emptied a pool of {pool_size}"
            )));
        }

        let mut candidates = ranked
            .into_iter()
            .map(|(_, possibility)| {
                let evaluation = evaluator.evaluate(&possibility, level, lines, mode, next)?;
                let partial_value = line_clear_value(possibility.lines_cleared, &evaluator.params);
                Ok(Candidate {
                    possibility,
                    evaluation,
                    partial_value,
                })
            })
            .collect::<RabbitResult<Vec<_>>>()?;
        candidates.sort_by(|a, b| score_cmp(a.evaluation.value, b.evaluation.value));

        debug!(
            piece = %request.piece,
            %mode,
            pool = pool_size,
            evaluated = candidates.len(),
            best = candidates[0].evaluation.value,
            "depth-1 search"
        );
        Ok(Depth1 { mode, candidates })
    }

    /// Searches the next piece after each of the top candidates and keeps the best chains.
    fn expand_with_next(
        &self,
        ctx: &EvalContext,
        state: &SearchState,
        next: Piece,
        candidates: Vec<Candidate>,
        params: &AiParams,
        mods: &ParamMods,
    ) -> RabbitResult<(Vec<PossibilityChain>, Vec<PossibilityChain>)> {
        let mut chains = Vec::new();
        for candidate in candidates.into_iter().take(self.config.beam_width) {
            let cleared = candidate.possibility.lines_cleared;
            let level_after = level_after_placement(state.level, state.lines, cleared);
            let lines_after = state.lines + cleared as u32;
            let request = PlacementRequest::fresh(next, level_after, &state.timeline);
            let inner = self.search_depth_1(
                ctx,
                &candidate.possibility.board_after,
                &request,
                lines_after,
                None,
                params,
                mods,
            )?;

            if inner.candidates.is_empty() {
                let mut chain = candidate.into_chain();
                chain.total_value = self.config.dead_value + chain.partial_value;
                chains.push(chain);
                continue;
            }
            for inner_candidate in inner.candidates {
                chains.push(PossibilityChain::extend(
                    candidate.possibility.clone(),
                    candidate.partial_value,
                    inner_candidate.into_chain(),
                ));
            }
        }

        let merged = chains.len();
        chains.sort_by(|a, b| score_cmp(a.total_value, b.total_value));
        let pruned = chains.split_off(self.config.chain_width.min(chains.len()));
        if chains.is_empty() && merged > 0 {
            return Err(RabbitError::Invariant(format!("chain pruning emptied {merged} chains")));
        }
        debug!(merged, kept = chains.len(), pruned = pruned.len(), "depth-2 merge");
        Ok((chains, pruned))
    }
}

/// Descending by value; NaN never reaches here.
pub(crate) fn score_cmp(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn orchestrator() -> SearchOrchestrator {
        SearchOrchestrator::new(SurfaceRater::Flatness, SearchConfig::default()).expect("valid config")
    }

    fn state(board: Board, piece: Piece) -> SearchState {
        SearchState::new(board, piece, 18, 0, InputTimeline::hz_12())
    }

    #[test]
    fn test_rejects_bad_depths() {
        let orch = orchestrator();
        let s = state(Board::new(), Piece::T);
        let params = AiParams::default();
        let mods = ParamMods::default();
        assert!(orch.best_move(&s, &params, &mods, 0, 0).is_err());
        assert!(orch.best_move(&s, &params, &mods, 3, 0).is_err());
        assert!(orch.best_move(&s, &params, &mods, 1, 5).is_err());
    }

    #[test]
    fn test_depth_1_sorted_and_truncated() {
        let orch = orchestrator();
        let ctx = orch.context(&InputTimeline::hz_12());
        let board = Board::flat_stack(3);
        let timeline = InputTimeline::hz_12();
        let request = PlacementRequest::fresh(Piece::T, 18, &timeline);
        let result = orch
            .search_depth_1(&ctx, &board, &request, 0, None, &AiParams::default(), &ParamMods::default())
            .expect("valid search");
        assert_eq!(result.mode, AiMode::Standard);
        assert!(!result.candidates.is_empty());
        assert!(result.candidates.len() <= 40);
        for pair in result.candidates.windows(2) {
            assert!(pair[0].evaluation.value >= pair[1].evaluation.value);
        }
    }

    #[test]
    fn test_takes_the_tetris() {
        let orch = orchestrator();
        let s = state(Board::flat_stack(4), Piece::I);
        let best = orch
            .best_move(&s, &AiParams::default(), &ParamMods::default(), 1, 0)
            .expect("valid search")
            .expect("legal placement");
        assert_eq!(best.possibility.lines_cleared, 4);
    }

    #[test]
    fn test_no_placement_is_none() {
        let mut board = Board::new();
        for row in 0..Board::HEIGHT {
            for col in 0..Board::WIDTH - 1 {
                board.set(col, row, true);
            }
        }
        let orch = orchestrator();
        let s = state(board, Piece::T);
        let best = orch
            .best_move(&s, &AiParams::default(), &ParamMods::default(), 1, 0)
            .expect("valid search");
        assert!(best.is_none());
    }

    #[test]
    fn test_depth_2_chains_and_pruning() {
        let orch = orchestrator();
        let s = state(Board::flat_stack(3), Piece::T).with_next(Piece::O);
        let outcome = orch
            .search(&s, &AiParams::default(), &ParamMods::default(), 2, 0)
            .expect("valid search");
        assert_eq!(outcome.chains.len(), 3);
        assert!(!outcome.pruned.is_empty());
        for chain in &outcome.chains {
            let inner = chain.inner.as_ref().expect("two placements");
            assert_eq!(inner.possibility.piece, Piece::O);
            assert!((chain.total_value - (inner.total_value + chain.partial_value)).abs() < 1e-9);
        }
        let worst_kept = outcome.chains.last().expect("kept chains").total_value;
        assert!(outcome.pruned.iter().all(|c| c.total_value <= worst_kept));
    }

    #[test]
    fn test_depth_2_without_next_is_depth_1() {
        let orch = orchestrator();
        let s = state(Board::flat_stack(3), Piece::L);
        let outcome = orch
            .search(&s, &AiParams::default(), &ParamMods::default(), 2, 0)
            .expect("valid search");
        assert!(outcome.chains.iter().all(|c| c.inner.is_none()));
        assert!(outcome.pruned.is_empty());
    }

    #[test]
    fn test_search_is_deterministic() {
        let orch = orchestrator();
        let s = state(Board::flat_stack(5), Piece::S).with_next(Piece::Z);
        let a = orch
            .best_move(&s, &AiParams::default(), &ParamMods::default(), 2, 0)
            .expect("valid search");
        let b = orch
            .best_move(&s, &AiParams::default(), &ParamMods::default(), 2, 0)
            .expect("valid search");
        assert_eq!(a, b);
    }
}
