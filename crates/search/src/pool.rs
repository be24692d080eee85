//! Worker pool that searches one adjustment per possible next piece.

use std::sync::mpsc::{self, Sender};
use std::sync::Arc;

use rabbit_core::{Piece, RabbitError, RabbitResult, SearchState};
use rabbit_eval::{AiParams, ParamMods};
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::{debug, info, trace};

use crate::chain::PossibilityChain;
use crate::orchestrator::SearchOrchestrator;

/// One worker per piece type.
pub const DEFAULT_THREADS: usize = 7;

#[derive(Clone, Debug)]
pub struct AdjustmentTask {
    pub next_piece: Piece,
    /// Predicted state with `next_piece` filled in.
    pub state: SearchState,
}

#[derive(Debug)]
pub struct AdjustmentResult {
    pub next_piece: Piece,
    pub outcome: RabbitResult<Option<PossibilityChain>>,
}

pub struct AdjustmentPool {
    pool: ThreadPool,
    orchestrator: Arc<SearchOrchestrator>,
}

impl AdjustmentPool {
    pub fn new(orchestrator: Arc<SearchOrchestrator>, threads: usize) -> RabbitResult<Self> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("rabbit-adjust-{i}"))
            .build()
            .map_err(|e| RabbitError::Config(format!("adjustment pool: {e}")))?;
        info!(threads, "adjustment pool ready");
        Ok(Self { pool, orchestrator })
    }

    pub fn orchestrator(&self) -> &Arc<SearchOrchestrator> {
        &self.orchestrator
    }

    /// Queues `task`; its result arrives on `results`.
    pub fn dispatch(
        &self,
        task: AdjustmentTask,
        params: Arc<AiParams>,
        mods: Arc<ParamMods>,
        results: Sender<AdjustmentResult>,
    ) {
        let orchestrator = Arc::clone(&self.orchestrator);
        self.pool.spawn(move || {
            let outcome = orchestrator.best_move(&task.state, &params, &mods, 2, 0);
            let next_piece = task.next_piece;
            if results.send(AdjustmentResult { next_piece, outcome }).is_err() {
                trace!(%next_piece, "adjustment receiver dropped");
            }
        });
    }

    /// Runs every task and returns the results in task order.
    pub fn run_all(
        &self,
        tasks: Vec<AdjustmentTask>,
        params: &AiParams,
        mods: &ParamMods,
    ) -> RabbitResult<Vec<AdjustmentResult>> {
        let order: Vec<Piece> = tasks.iter().map(|t| t.next_piece).collect();
        let params = Arc::new(params.clone());
        let mods = Arc::new(mods.clone());
        let (tx, rx) = mpsc::channel();
        for task in tasks {
            self.dispatch(task, Arc::clone(&params), Arc::clone(&mods), tx.clone());
        }
        drop(tx);

        let mut results: Vec<AdjustmentResult> = rx.iter().collect();
        if results.len() != order.len() {
            return Err(RabbitError::Invariant(format!(
                "{} of {} adjustment tasks reported",
                results.len(),
                order.len()
            )));
        }
        results.sort_by_key(|r| order.iter().position(|&p| p == r.next_piece));
        debug!(tasks = results.len(), "adjustments finished");
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SearchConfig;
    use rabbit_core::{Board, InputTimeline};
    use rabbit_engine::RNG_ORDER;
    use rabbit_eval::SurfaceRater;

    fn pool() -> AdjustmentPool {
        let orchestrator = Arc::new(
            SearchOrchestrator::new(SurfaceRater::Flatness, SearchConfig::default()).expect("valid config"),
        );
        AdjustmentPool::new(orchestrator, 2).expect("pool builds")
    }

    #[test]
    fn test_dropped_receiver_leaves_pool_usable() {
        let pool = pool();
        let state = SearchState::new(Board::flat_stack(2), Piece::T, 18, 0, InputTimeline::hz_12());
        let (tx, rx) = mpsc::channel();
        drop(rx);
        pool.dispatch(
            AdjustmentTask {
                next_piece: Piece::O,
                state: state.clone().with_next(Piece::O),
            },
            Arc::new(AiParams::default()),
            Arc::new(ParamMods::default()),
            tx,
        );
        let task = AdjustmentTask {
            next_piece: Piece::I,
            state: state.with_next(Piece::I),
        };
        let results = pool
            .run_all(vec![task], &AiParams::default(), &ParamMods::default())
            .expect("task reports");
        assert_eq!(results.len(), 1);
        assert!(results[0].outcome.is_ok());
    }

    #[test]
    fn test_one_result_per_piece_in_order() {
        let pool = pool();
        let base = SearchState::new(Board::flat_stack(2), Piece::L, 18, 0, InputTimeline::hz_12());
        let tasks = RNG_ORDER
            .iter()
            .map(|&next_piece| AdjustmentTask {
                next_piece,
                state: base.clone().with_next(next_piece),
            })
            .collect();
        let results = pool
            .run_all(tasks, &AiParams::default(), &ParamMods::default())
            .expect("all tasks report");
        let pieces: Vec<Piece> = results.iter().map(|r| r.next_piece).collect();
        assert_eq!(pieces, RNG_ORDER.to_vec());
        for result in &results {
            let chain = result.outcome.as_ref().expect("valid search").as_ref().expect("legal placement");
            assert_eq!(chain.depth(), 2);
            assert_eq!(chain.leaf().possibility.piece, result.next_piece);
        }
    }
}
