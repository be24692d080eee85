//! Per-frame controller inputs and the sequences built from them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RabbitError;

/// What happens on a single frame.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum Input {
    Wait,
    Left,
    Right,
    RotateRight,
    RotateLeft,
    LeftRotateRight,
    LeftRotateLeft,
    RightRotateRight,
    RightRotateLeft,
    /// Entry delay frame after the piece locks.
    Entry,
    /// Line clear animation frame.
    LineClear,
}

impl Input {
    pub fn as_char(self) -> char {
        match self {
            Input::Wait => '.',
            Input::Left => 'L',
            Input::Right => 'R',
            Input::RotateRight => 'A',
            Input::RotateLeft => 'B',
            Input::LeftRotateRight => 'E',
            Input::LeftRotateLeft => 'F',
            Input::RightRotateRight => 'I',
            Input::RightRotateLeft => 'G',
            Input::Entry => '*',
            Input::LineClear => '^',
        }
    }

    pub fn from_char(c: char) -> Option<Input> {
        Some(match c {
            '.' => Input::Wait,
            'L' => Input::Left,
            'R' => Input::Right,
            'A' => Input::RotateRight,
            'B' => Input::RotateLeft,
            'E' => Input::LeftRotateRight,
            'F' => Input::LeftRotateLeft,
            'I' => Input::RightRotateRight,
            'G' => Input::RightRotateLeft,
            '*' => Input::Entry,
            '^' => Input::LineClear,
            _ => return None,
        })
    }

    /// Combines a lateral shift (-1, 0, +1) with a rotation (-1, 0, +1).
    pub fn combine(shift: i8, rotation: i8) -> Input {
        match (shift.signum(), rotation.signum()) {
            (-1, 1) => Input::LeftRotateRight,
            (-1, -1) => Input::LeftRotateLeft,
            (-1, _) => Input::Left,
            (1, 1) => Input::RightRotateRight,
            (1, -1) => Input::RightRotateLeft,
            (1, _) => Input::Right,
            (_, 1) => Input::RotateRight,
            (_, -1) => Input::RotateLeft,
            _ => Input::Wait,
        }
    }

    /// Lateral component: -1 left, +1 right.
    pub fn shift(self) -> i8 {
        match self {
            Input::Left | Input::LeftRotateRight | Input::LeftRotateLeft => -1,
            Input::Right | Input::RightRotateRight | Input::RightRotateLeft => 1,
            _ => 0,
        }
    }

    /// Rotational component: +1 right, -1 left.
    pub fn rotation(self) -> i8 {
        match self {
            Input::RotateRight | Input::LeftRotateRight | Input::RightRotateRight => 1,
            Input::RotateLeft | Input::LeftRotateLeft | Input::RightRotateLeft => -1,
            _ => 0,
        }
    }

    /// True for anything a controller actually presses.
    pub fn is_press(self) -> bool {
        self.shift() != 0 || self.rotation() != 0
    }
}

/// Frame-by-frame input string, e.g. `"E...R...*****"`.
#[derive(Clone, PartialEq, Eq, Debug, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct InputSequence {
    frames: Vec<Input>,
}

impl InputSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, input: Input) {
        self.frames.push(input);
    }

    pub fn push_repeated(&mut self, input: Input, count: usize) {
        self.frames.extend(std::iter::repeat(input).take(count));
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn frames(&self) -> &[Input] {
        &self.frames
    }

    pub fn iter(&self) -> impl Iterator<Item = Input> + '_ {
        self.frames.iter().copied()
    }

    /// Number of frames that press something.
    pub fn press_count(&self) -> usize {
        self.frames.iter().filter(|i| i.is_press()).count()
    }
}

impl fmt::Display for InputSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for input in &self.frames {
            write!(f, "{}", input.as_char())?;
        }
        Ok(())
    }
}

impl FromStr for InputSequence {
    type Err = RabbitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let frames = s
            .chars()
            .map(|c| {
                Input::from_char(c)
                    .ok_or_else(|| RabbitError::InvalidInput(format!("unknown input {:?}", c)))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { frames })
    }
}

impl TryFrom<String> for InputSequence {
    type Error = RabbitError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<InputSequence> for String {
    fn from(value: InputSequence) -> Self {
        value.to_string()
    }
}
