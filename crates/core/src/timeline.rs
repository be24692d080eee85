//! Repeating input-frame pattern describing how fast a player can tap.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{RabbitError, RabbitResult};

/// Pattern of `X` (input allowed) and `.` (idle) frames, repeated forever.
#[derive(Clone, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct InputTimeline {
    frames: Vec<bool>,
}

impl InputTimeline {
    pub fn new(pattern: &str) -> RabbitResult<Self> {
        if pattern.is_empty() {
            return Err(RabbitError::InvalidTimeline("empty pattern".into()));
        }
        let frames = pattern
            .chars()
            .map(|c| match c {
                'X' => Ok(true),
                '.' => Ok(false),
                other => Err(RabbitError::InvalidTimeline(format!(
                    "unexpected character {:?}",
                    other
                ))),
            })
            .collect::<RabbitResult<Vec<_>>>()?;
        if !frames.contains(&true) {
            return Err(RabbitError::InvalidTimeline(
                "pattern has no input frames".into(),
            ));
        }
        Ok(Self { frames })
    }

    /// One `X` followed by `d` idle frames per delay, e.g. `[4, 3]` -> `X....X...`.
    pub fn from_delays(delays: &[u8]) -> RabbitResult<Self> {
        if delays.is_empty() {
            return Err(RabbitError::InvalidTimeline("no delays given".into()));
        }
        Ok(Self::preset(delays))
    }

    fn preset(delays: &[u8]) -> Self {
        let mut frames = Vec::new();
        for &d in delays {
            frames.push(true);
            frames.extend(std::iter::repeat(false).take(d as usize));
        }
        Self { frames }
    }

    pub fn hz_10() -> Self {
        Self::preset(&[5])
    }

    pub fn hz_12() -> Self {
        Self::preset(&[4])
    }

    pub fn hz_13() -> Self {
        Self::preset(&[4, 3])
    }

    pub fn hz_13_5() -> Self {
        Self::preset(&[4, 3, 3])
    }

    pub fn hz_14() -> Self {
        Self::preset(&[4, 3, 3, 3])
    }

    pub fn hz_15() -> Self {
        Self::preset(&[3])
    }

    pub fn hz_20() -> Self {
        Self::preset(&[2])
    }

    pub fn hz_30() -> Self {
        Self::preset(&[1])
    }

    #[inline]
    pub fn is_input_frame(&self, frame: u32) -> bool {
        self.frames[frame as usize % self.frames.len()]
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Input frames among frames `0..frames`.
    pub fn input_frames_before(&self, frames: u32) -> u32 {
        (0..frames).filter(|&f| self.is_input_frame(f)).count() as u32
    }
}

impl Default for InputTimeline {
    fn default() -> Self {
        Self::hz_12()
    }
}

impl fmt::Display for InputTimeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &input in &self.frames {
            write!(f, "{}", if input { 'X' } else { '.' })?;
        }
        Ok(())
    }
}

impl FromStr for InputTimeline {
    type Err = RabbitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for InputTimeline {
    type Error = RabbitError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<InputTimeline> for String {
    fn from(value: InputTimeline) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_delays() {
        let t = InputTimeline::from_delays(&[4, 3]).expect("valid delays");
        assert_eq!(t.to_string(), "X....X...");
        assert_eq!(InputTimeline::hz_12().to_string(), "X....");
        assert_eq!(InputTimeline::hz_14().len(), 17);
    }

    #[test]
    fn test_is_input_frame_wraps() {
        let t = InputTimeline::new("X...").expect("valid pattern");
        assert!(t.is_input_frame(0));
        assert!(!t.is_input_frame(3));
        assert!(t.is_input_frame(4));
        assert!(t.is_input_frame(400));
        assert_eq!(t.input_frames_before(9), 3);
    }

    #[test]
    fn test_rejects_malformed() {
        assert!(InputTimeline::new("").is_err());
        assert!(InputTimeline::new("....").is_err());
        assert!(InputTimeline::new("X.x").is_err());
        assert!(InputTimeline::from_delays(&[]).is_err());
    }
}
