//! One precompute at a time: a default placement, then the best adjustment
//! for every possible next piece.

use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread;

use rabbit_core::{RabbitError, RabbitResult, SearchState};
use rabbit_engine::RNG_ORDER;
use rabbit_eval::{AiParams, ParamMods};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::adjustment::predict_state_at_adjustment_time;
use crate::chain::PossibilityChain;
use crate::pool::{AdjustmentPool, AdjustmentResult, AdjustmentTask};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("a precompute is already running")]
    Busy,
    #[error(transparent)]
    Engine(#[from] RabbitError),
}

#[derive(Clone, Debug)]
pub struct PrecomputeRequest {
    pub state: SearchState,
    pub params: AiParams,
    pub mods: ParamMods,
    /// Frames before the player reacts to the next box; 0 skips the default.
    pub reaction_frames: u32,
}

#[derive(Debug)]
pub struct PrecomputeResult {
    /// Placement played before the next piece is known.
    pub default: Option<PossibilityChain>,
    /// One entry per possible next piece, in randomizer order. Empty when the
    /// default search found no legal placement.
    pub adjustments: Vec<AdjustmentResult>,
}

#[derive(Clone, Debug)]
pub enum Poll {
    NeverRequested,
    Pending { partial: Option<PossibilityChain> },
    Ready(Arc<PrecomputeResult>),
    Failed(Arc<RabbitError>),
}

#[derive(Default)]
enum Job {
    #[default]
    Idle,
    Running {
        partial: Option<PossibilityChain>,
    },
    Done(Arc<PrecomputeResult>),
    Failed(Arc<RabbitError>),
}

#[derive(Default)]
struct Shared {
    job: Mutex<Job>,
    finished: Condvar,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Job> {
        self.job.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

pub struct Session {
    pool: Arc<AdjustmentPool>,
    shared: Arc<Shared>,
}

impl Session {
    pub fn new(pool: Arc<AdjustmentPool>) -> Self {
        Self {
            pool,
            shared: Arc::new(Shared::default()),
        }
    }

    /// Starts a precompute in the background.
    pub fn submit(&self, request: PrecomputeRequest) -> Result<(), SessionError> {
        request.state.validate()?;
        {
            let mut job = self.shared.lock();
            if matches!(*job, Job::Running { .. }) {
                return Err(SessionError::Busy);
            }
            *job = Job::Running { partial: None };
        }
        info!(piece = %request.state.piece, reaction = request.reaction_frames, "precompute started");

        let pool = Arc::clone(&self.pool);
        let shared = Arc::clone(&self.shared);
        thread::spawn(move || {
            let guard = FinishGuard::new(Arc::clone(&shared));
            guard.finish(precompute(&pool, &shared, &request));
        });
        Ok(())
    }

    pub fn poll(&self) -> Poll {
        snapshot(&self.shared.lock())
    }

    /// Blocks until the running precompute, if any, has finished.
    pub fn wait(&self) -> Poll {
        let mut job = self.shared.lock();
        while matches!(*job, Job::Running { .. }) {
            job = self.shared.finished.wait(job).unwrap_or_else(PoisonError::into_inner);
        }
        snapshot(&job)
    }
}

/// Publishes the coordinator's outcome; if the coordinator unwinds first,
/// the job is marked failed so waiters wake and the session frees up.
struct FinishGuard {
    shared: Option<Arc<Shared>>,
}

impl FinishGuard {
    fn new(shared: Arc<Shared>) -> Self {
        Self { shared: Some(shared) }
    }

    fn finish(mut self, outcome: RabbitResult<PrecomputeResult>) {
        let job = match outcome {
            Ok(result) => Job::Done(Arc::new(result)),
            Err(e) => Job::Failed(Arc::new(e)),
        };
        if let Some(shared) = self.shared.take() {
            publish(&shared, job);
        }
    }
}

impl Drop for FinishGuard {
    fn drop(&mut self) {
        if let Some(shared) = self.shared.take() {
            warn!("precompute coordinator panicked");
            publish(
                &shared,
                Job::Failed(Arc::new(RabbitError::Invariant("precompute panicked".to_string()))),
            );
        }
    }
}

fn publish(shared: &Shared, job: Job) {
    *shared.lock() = job;
    shared.finished.notify_all();
}

fn snapshot(job: &Job) -> Poll {
    match job {
        Job::Idle => Poll::NeverRequested,
        Job::Running { partial } => Poll::Pending {
            partial: partial.clone(),
        },
        Job::Done(result) => Poll::Ready(Arc::clone(result)),
        Job::Failed(e) => Poll::Failed(Arc::clone(e)),
    }
}

fn precompute(pool: &AdjustmentPool, shared: &Shared, request: &PrecomputeRequest) -> RabbitResult<PrecomputeResult> {
    let orchestrator = pool.orchestrator();
    let mut default = None;
    let mut start = request.state.clone();

    if request.reaction_frames > 0 {
        let mut state = request.state.clone();
        state.next_piece = None;
        default = orchestrator.best_move(&state, &request.params, &request.mods, 1, 1)?;
        let Some(chain) = &default else {
            debug!("no legal placement for the default");
            return Ok(PrecomputeResult {
                default: None,
                adjustments: Vec::new(),
            });
        };
        if let Job::Running { partial } = &mut *shared.lock() {
            *partial = Some(chain.clone());
        }
        start = predict_state_at_adjustment_time(
            &state,
            &chain.possibility.inputs,
            request.reaction_frames,
            orchestrator.config().engine.gravity,
        );
    }

    let tasks = RNG_ORDER
        .iter()
        .map(|&next_piece| AdjustmentTask {
            next_piece,
            state: start.clone().with_next(next_piece),
        })
        .collect();
    let adjustments = pool.run_all(tasks, &request.params, &request.mods)?;
    info!(adjustments = adjustments.len(), "precompute finished");
    Ok(PrecomputeResult { default, adjustments })
}
