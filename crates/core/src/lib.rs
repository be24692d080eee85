//! Rabbit core crate - board, pieces, inputs and placement records.

mod board;
pub mod error;
mod inputs;
mod piece;
mod possibility;
mod state;
mod surface;
mod timeline;

pub use board::Board;
pub use error::{ensure_range, RabbitError, RabbitResult};
pub use inputs::{Input, InputSequence};
pub use piece::{Piece, SPAWN_X};
pub use possibility::{InputClass, Placement, Possibility};
pub use state::SearchState;
pub use surface::{is_tuck_setup, BoardSurface, HoleCells, DEFAULT_WELL_COLUMN};
pub use timeline::InputTimeline;
