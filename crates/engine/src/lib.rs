//! rabbit-engine - NES frame simulation and placement generation.
//!
//! Enumerates every resting placement a piece can reach under a given
//! gravity and tap speed, including late tucks and spins.

pub mod apply;
pub mod collision;
pub mod config;
pub mod gravity;
pub mod lock;
pub mod movegen;
pub mod placement;
pub mod rng;
pub mod sequence;
pub mod sim;
pub mod tuck;

pub use apply::{build_possibility, entry_delay_frames, place_piece};
pub use collision::{can_place, collides, drop_y};
pub use config::EngineConfig;
pub use gravity::{is_gravity_frame, GravitySystem};
pub use lock::{lock_hover_states, Departure, HeightTable, LockResult};
pub use movegen::{enumerate_placements, enumerate_tap_placements, PlacementRequest};
pub use placement::{can_do_placement, hover_states, placement_is_legal, tap_height};
pub use rng::{PieceRngModel, RNG_ORDER};
pub use sequence::generate_input_sequence;
pub use sim::{FrameOutcome, SimParams, SimState};
pub use tuck::search_tucks_and_spins;
