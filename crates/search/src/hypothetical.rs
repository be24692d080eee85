//! Expected value of a chain over the unknown pieces that follow it.
//!
//! Every piece line of the requested length is walked as a prefix tree in
//! randomizer order, placing the best depth-1 move at each node. A line that
//! runs out of placements stops there and is worth the configured dead value.

use rabbit_core::{Board, Piece, RabbitResult, SearchState};
use rabbit_engine::{PlacementRequest, RNG_ORDER};
use rabbit_eval::{level_after_placement, AiParams, EvalContext, ParamMods};
use tracing::trace;

use crate::chain::{HypotheticalOutcome, PossibilityChain};
use crate::orchestrator::SearchOrchestrator;

/// Returns the chain's expected value and the outcome of every piece line.
pub fn expected_value(
    orchestrator: &SearchOrchestrator,
    ctx: &EvalContext,
    state: &SearchState,
    chain: &PossibilityChain,
    depth: u8,
    params: &AiParams,
    mods: &ParamMods,
) -> RabbitResult<(f64, Vec<HypotheticalOutcome>)> {
    let mut level = state.level;
    let mut lines = state.lines;
    let mut link = Some(chain);
    while let Some(current) = link {
        let cleared = current.possibility.lines_cleared;
        level = level_after_placement(level, lines, cleared);
        lines += cleared as u32;
        link = current.inner.as_deref();
    }
    let leaf = chain.leaf();

    let walker = LineWalker {
        orchestrator,
        ctx,
        params,
        mods,
        outcomes: Vec::new(),
        prefix: Vec::with_capacity(depth as usize),
    };
    let outcomes = walker.run(&leaf.possibility.board_after, leaf.possibility.piece, level, lines, depth)?;

    let weighted: f64 = outcomes.iter().map(|o| o.probability * o.value).sum();
    let ev = chain.partial_sum() + weighted;
    trace!(lines = outcomes.len(), ev, "hypothetical lines walked");
    Ok((ev, outcomes))
}

struct LineWalker<'a> {
    orchestrator: &'a SearchOrchestrator,
    ctx: &'a EvalContext,
    params: &'a AiParams,
    mods: &'a ParamMods,
    outcomes: Vec<HypotheticalOutcome>,
    prefix: Vec<Piece>,
}

impl LineWalker<'_> {
    fn run(
        mut self,
        board: &Board,
        previous: Piece,
        level: u32,
        lines: u32,
        depth: u8,
    ) -> RabbitResult<Vec<HypotheticalOutcome>> {
        self.walk(board, previous, level, lines, depth, 1.0, 0.0)?;
        Ok(self.outcomes)
    }

    #[allow(clippy::too_many_arguments)]
    fn walk(
        &mut self,
        board: &Board,
        previous: Piece,
        level: u32,
        lines: u32,
        remaining: u8,
        probability: f64,
        banked: f64,
    ) -> RabbitResult<()> {
        let rng = self.orchestrator.config().rng;
        for piece in RNG_ORDER {
            let p = probability * rng.probability(previous, piece);
            self.prefix.push(piece);

            let request = PlacementRequest::fresh(piece, level, &self.ctx.timeline);
            let found = self
                .orchestrator
                .search_depth_1(self.ctx, board, &request, lines, None, self.params, self.mods)?;
            match found.candidates.first() {
                None => self.record(p, self.orchestrator.config().dead_value),
                Some(best) if remaining == 1 => self.record(p, banked + best.evaluation.value),
                Some(best) => {
                    let cleared = best.possibility.lines_cleared;
                    let next_level = level_after_placement(level, lines, cleared);
                    let board_after = best.possibility.board_after;
                    let banked = banked + best.partial_value;
                    self.walk(
                        &board_after,
                        piece,
                        next_level,
                        lines + cleared as u32,
                        remaining - 1,
                        p,
                        banked,
                    )?;
                }
            }

            self.prefix.pop();
        }
        Ok(())
    }

    fn record(&mut self, probability: f64, value: f64) {
        self.outcomes.push(HypotheticalOutcome {
            sequence: self.prefix.clone(),
            probability,
            value,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SearchConfig;
    use rabbit_core::InputTimeline;
    use rabbit_eval::SurfaceRater;

    #[test]
    fn test_probabilities_sum_to_one() {
        let orch = SearchOrchestrator::new(SurfaceRater::Flatness, SearchConfig::default()).expect("valid config");
        let state = SearchState::new(Board::flat_stack(2), Piece::T, 18, 0, InputTimeline::hz_12());
        let params = AiParams::default();
        let mods = ParamMods::default();
        let chain = orch
            .best_move(&state, &params, &mods, 1, 0)
            .expect("valid search")
            .expect("legal placement");
        let ctx = orch.context(&state.timeline);
        let (ev, outcomes) = expected_value(&orch, &ctx, &state, &chain, 2, &params, &mods).expect("walk");

        assert_eq!(outcomes.len(), 49);
        let total: f64 = outcomes.iter().map(|o| o.probability).sum();
        assert!((total - 1.0).abs() < 1e-9);
        let weighted: f64 = outcomes.iter().map(|o| o.probability * o.value).sum();
        assert!((ev - (chain.partial_sum() + weighted)).abs() < 1e-9);
        assert_eq!(outcomes[0].sequence, vec![Piece::T, Piece::T]);
        assert_eq!(outcomes[48].sequence, vec![Piece::I, Piece::I]);
    }
}
