//! Rabbit search crate - placement chains, next-piece lookahead and the
//! precompute session.

mod adjustment;
mod chain;
mod config;
mod hypothetical;
mod orchestrator;
mod pool;
mod session;

pub use adjustment::predict_state_at_adjustment_time;
pub use chain::{HypotheticalOutcome, PossibilityChain};
pub use config::SearchConfig;
pub use hypothetical::expected_value;
pub use orchestrator::{Candidate, Depth1, SearchOrchestrator, SearchOutcome};
pub use pool::{AdjustmentPool, AdjustmentResult, AdjustmentTask, DEFAULT_THREADS};
pub use session::{Poll, PrecomputeRequest, PrecomputeResult, Session, SessionError};
