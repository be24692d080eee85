//! Placement generation: hover states, their gravity locks, then tucks/spins.

use rabbit_core::{ensure_range, Board, InputTimeline, Piece, Placement, Possibility, RabbitError, RabbitResult, SearchState};
use rustc_hash::FxHashSet;
use tracing::debug;

use crate::config::EngineConfig;
use crate::lock::lock_hover_states;
use crate::placement::hover_states;
use crate::sim::SimParams;
use crate::tuck::search_tucks_and_spins;

/// The piece's situation when the search starts.
#[derive(Clone, Debug)]
pub struct PlacementRequest<'a> {
    pub piece: Piece,
    pub level: u32,
    pub x_offset: i8,
    pub y_offset: i8,
    pub frames_elapsed: u32,
    pub rotation: u8,
    pub can_first_frame_shift: bool,
    pub timeline: &'a InputTimeline,
}

impl<'a> PlacementRequest<'a> {
    /// A piece that has just spawned.
    pub fn fresh(piece: Piece, level: u32, timeline: &'a InputTimeline) -> Self {
        Self {
            piece,
            level,
            x_offset: 0,
            y_offset: 0,
            frames_elapsed: 0,
            rotation: 0,
            can_first_frame_shift: false,
            timeline,
        }
    }

    pub fn from_state(state: &'a SearchState) -> Self {
        Self {
            piece: state.piece,
            level: state.level,
            x_offset: state.x_offset,
            y_offset: state.y_offset,
            frames_elapsed: state.frames_elapsed,
            rotation: state.rotation,
            can_first_frame_shift: state.can_first_frame_shift,
            timeline: &state.timeline,
        }
    }

    pub fn validate(&self) -> RabbitResult<()> {
        ensure_range("level", self.level as i64, 0, 999)?;
        ensure_range("x_offset", self.x_offset as i64, -5, 4)?;
        ensure_range("y_offset", self.y_offset as i64, 0, 20)?;
        ensure_range("frames_elapsed", self.frames_elapsed as i64, 0, 999)?;
        ensure_range("rotation", self.rotation as i64, 0, 3)?;
        if self.rotation >= self.piece.num_rotations() {
            return Err(RabbitError::OutOfRange {
                name: "rotation",
                value: self.rotation as i64,
                min: 0,
                max: self.piece.num_rotations() as i64 - 1,
            });
        }
        Ok(())
    }
}

/// Every distinct final placement reachable from `request`.
/// An empty list means the piece has nowhere to go.
pub fn enumerate_placements(
    board: &Board,
    request: &PlacementRequest,
    config: &EngineConfig,
) -> RabbitResult<Vec<Possibility>> {
    request.validate()?;
    if request.y_offset >= Board::HEIGHT as i8 {
        return Ok(Vec::new());
    }
    let params = SimParams::from_request(board, request, config.gravity);
    let hovers = hover_states(&params);
    let mut locked = lock_hover_states(&params, &hovers, config.well_column);
    let mut possibilities = std::mem::take(&mut locked.possibilities);

    if config.tucks_enabled {
        let mut seen: FxHashSet<Placement> = possibilities.iter().map(|p| p.placement).collect();
        let adjustments = search_tucks_and_spins(
            &params,
            &locked.departures,
            &mut locked.heights,
            &mut seen,
            config.well_column,
        );
        debug!(
            piece = %request.piece,
            taps = possibilities.len(),
            adjustments = adjustments.len(),
            "enumerated placements"
        );
        possibilities.extend(adjustments);
    }
    Ok(possibilities)
}

/// Placements reachable by taps alone, ignoring the tuck setting.
pub fn enumerate_tap_placements(
    board: &Board,
    request: &PlacementRequest,
    config: &EngineConfig,
) -> RabbitResult<Vec<Possibility>> {
    let tap_only = EngineConfig {
        tucks_enabled: false,
        ..config.clone()
    };
    enumerate_placements(board, request, &tap_only)
}
