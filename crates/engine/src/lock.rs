//! Gravity-only drop from each hover state, recording where tucks and spins
//! could branch off on the way down.

use rabbit_core::{Input, InputClass, InputSequence, Possibility};

use crate::apply::build_possibility;
use crate::sequence::generate_input_sequence;
use crate::sim::{SimParams, SimState};

const X_SLOTS: usize = 16;
const X_BIAS: i8 = 3;

/// Lowest lock row seen per (rotation, x).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeightTable {
    slots: [[Option<i8>; X_SLOTS]; 4],
}

impl Default for HeightTable {
    fn default() -> Self {
        Self {
            slots: [[None; X_SLOTS]; 4],
        }
    }
}

impl HeightTable {
    fn slot(rotation: u8, x: i8) -> Option<(usize, usize)> {
        let col = x + X_BIAS;
        if rotation < 4 && col >= 0 && (col as usize) < X_SLOTS {
            Some((rotation as usize, col as usize))
        } else {
            None
        }
    }

    pub fn get(&self, rotation: u8, x: i8) -> Option<i8> {
        Self::slot(rotation, x).and_then(|(r, c)| self.slots[r][c])
    }

    /// Keeps the deepest lock row recorded for the key.
    pub fn record(&mut self, rotation: u8, x: i8, y: i8) {
        if let Some((r, c)) = Self::slot(rotation, x) {
            let entry = &mut self.slots[r][c];
            *entry = Some(entry.map_or(y, |old| old.max(y)));
        }
    }

    /// True unless `y` is strictly below everything locked at this key.
    pub fn already_reached(&self, rotation: u8, x: i8, y: i8) -> bool {
        self.get(rotation, x).is_some_and(|lock_y| y <= lock_y)
    }
}

/// A point on a drop path where a late input could still be tried.
#[derive(Clone, Debug)]
pub struct Departure {
    pub state: SimState,
    pub inputs: InputSequence,
}

/// Result of dropping every hover state.
#[derive(Debug, Default)]
pub struct LockResult {
    pub possibilities: Vec<Possibility>,
    pub heights: HeightTable,
    pub departures: Vec<Departure>,
}

pub fn lock_hover_states(params: &SimParams, hovers: &[SimState], well: usize) -> LockResult {
    let mut result = LockResult::default();
    let start_arr = if params.can_first_frame_shift {
        0
    } else {
        params.frames_elapsed
    };

    for hover in hovers {
        let rotation_diff = (hover.rotation as i8 - params.existing_rotation as i8).rem_euclid(4) as u8;
        let mut inputs =
            generate_input_sequence(rotation_diff, hover.x - params.initial_x, params.timeline, start_arr);
        let mut state = *hover;
        let mut watching = false;
        let mut highest_recorded = -1i8;

        loop {
            if !watching && params.is_input_frame(&state) {
                watching = true;
            }
            if watching && state.y > highest_recorded {
                result.departures.push(Departure {
                    state,
                    inputs: inputs.clone(),
                });
                highest_recorded = state.y;
            }
            inputs.push(Input::Wait);

            if params.is_gravity_frame(state.frame) {
                if params.resting(&state) {
                    result.heights.record(state.rotation, state.x, state.y);
                    result
                        .possibilities
                        .push(build_possibility(params, &state, inputs, InputClass::Tap, well));
                    break;
                }
                state.y += 1;
            }
            state.frame += 1;
            state.arr_frame += 1;
        }
    }
    result
}
