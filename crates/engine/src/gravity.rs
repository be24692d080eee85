//! Gravity speed per level for the NTSC and PAL releases.
//!
//! Gravity is expressed as frames per row: a frame `f` moves the piece down
//! when `f % G == G - 1`.

use serde::{Deserialize, Serialize};

const NTSC_FRAMES_PER_ROW: [u32; 19] = [48, 43, 38, 33, 28, 23, 18, 13, 8, 6, 5, 5, 5, 4, 4, 4, 3, 3, 3];
const PAL_FRAMES_PER_ROW: [u32; 19] = [36, 32, 29, 25, 22, 18, 15, 11, 7, 5, 4, 4, 4, 3, 3, 3, 2, 2, 2];

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Default, Serialize, Deserialize)]
pub enum GravitySystem {
    #[default]
    Ntsc,
    Pal,
}

impl GravitySystem {
    /// Frames it takes the piece to fall one row at `level`.
    pub fn frames_per_row(self, level: u32) -> u32 {
        let level = level as usize;
        match self {
            GravitySystem::Ntsc => match level {
                0..=18 => NTSC_FRAMES_PER_ROW[level],
                19..=28 => 2,
                _ => 1,
            },
            GravitySystem::Pal => match level {
                0..=18 => PAL_FRAMES_PER_ROW[level],
                _ => 1,
            },
        }
    }
}

#[inline(always)]
pub fn is_gravity_frame(frame: u32, frames_per_row: u32) -> bool {
    frame % frames_per_row == frames_per_row - 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ntsc_breakpoints() {
        let g = GravitySystem::Ntsc;
        assert_eq!(g.frames_per_row(0), 48);
        assert_eq!(g.frames_per_row(18), 3);
        assert_eq!(g.frames_per_row(19), 2);
        assert_eq!(g.frames_per_row(28), 2);
        assert_eq!(g.frames_per_row(29), 1);
        assert_eq!(g.frames_per_row(255), 1);
    }

    #[test]
    fn test_speeds_never_slow_down() {
        for system in [GravitySystem::Ntsc, GravitySystem::Pal] {
            for level in 1..40 {
                assert!(system.frames_per_row(level) <= system.frames_per_row(level - 1));
            }
        }
    }

    #[test]
    fn test_pal_is_faster() {
        assert!(GravitySystem::Pal.frames_per_row(18) < GravitySystem::Ntsc.frames_per_row(18));
        assert_eq!(GravitySystem::Pal.frames_per_row(19), 1);
    }

    #[test]
    fn test_gravity_frame_phase() {
        assert!(!is_gravity_frame(0, 3));
        assert!(is_gravity_frame(2, 3));
        assert!(is_gravity_frame(5, 3));
        assert!(is_gravity_frame(0, 1));
    }
}
