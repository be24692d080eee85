//! Per-level reach limits for 4- and 5-tap placements.

use rabbit_core::InputTimeline;
use rabbit_engine::{tap_height, GravitySystem};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Levels 29 and up all share the last entry.
pub const TAP_LEVELS: usize = 30;

/// Tallest stack still reachable with 4 and 5 taps, indexed by level.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TapHeights {
    pub max_4_tap: [i8; TAP_LEVELS],
    pub max_5_tap: [i8; TAP_LEVELS],
}

impl TapHeights {
    pub fn compute(timeline: &InputTimeline, gravity: GravitySystem) -> Self {
        // many levels share a gravity value
        let mut memo: FxHashMap<u32, (i8, i8)> = FxHashMap::default();
        let mut max_4_tap = [0; TAP_LEVELS];
        let mut max_5_tap = [0; TAP_LEVELS];
        for level in 0..TAP_LEVELS {
            let frames_per_row = gravity.frames_per_row(level as u32);
            let (four, five) = *memo.entry(frames_per_row).or_insert_with(|| {
                (
                    tap_height(level as u32, timeline, 4, gravity),
                    tap_height(level as u32, timeline, 5, gravity),
                )
            });
            max_4_tap[level] = four;
            max_5_tap[level] = five;
        }
        Self { max_4_tap, max_5_tap }
    }

    #[inline]
    fn index(level: u32) -> usize {
        (level as usize).min(TAP_LEVELS - 1)
    }

    pub fn max_4_tap(&self, level: u32) -> i8 {
        self.max_4_tap[Self::index(level)]
    }

    pub fn max_5_tap(&self, level: u32) -> i8 {
        self.max_5_tap[Self::index(level)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_heights() {
        let tables = TapHeights::compute(&InputTimeline::hz_12(), GravitySystem::Ntsc);
        assert_eq!(tables.max_5_tap(19), 8);
        let tables = TapHeights::compute(&InputTimeline::hz_13(), GravitySystem::Ntsc);
        assert_eq!(tables.max_5_tap(29), 0);
        assert!(tables.max_4_tap(29) >= tables.max_5_tap(29));
    }

    #[test]
    fn test_high_levels_share_killscreen_entry() {
        let tables = TapHeights::compute(&InputTimeline::hz_12(), GravitySystem::Ntsc);
        assert_eq!(tables.max_4_tap(29), tables.max_4_tap(157));
        assert_eq!(tables.max_5_tap(29), tables.max_5_tap(40));
    }

    #[test]
    fn test_slower_gravity_reaches_higher() {
        let tables = TapHeights::compute(&InputTimeline::hz_12(), GravitySystem::Ntsc);
        assert!(tables.max_5_tap(18) >= tables.max_5_tap(19));
        assert!(tables.max_5_tap(19) >= tables.max_5_tap(29));
        assert!(tables.max_4_tap(18) >= tables.max_5_tap(18));
    }
}
