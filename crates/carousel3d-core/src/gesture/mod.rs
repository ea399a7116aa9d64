//! Drag gesture handling
//!
//! A gesture arrives as `Start`, any number of `Move`s carrying the
//! cumulative delta since the start, and a final `Release`. The state
//! machine turns that stream into live offset updates and, on release,
//! a committed item index plus a snap spring.

mod machine;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use machine::{decide_swipe, GestureStateMachine, SWIPE_THRESHOLD};

/// One event of the pointer gesture stream
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureEvent {
    Start,
    /// Cumulative delta since `Start`
    Move { dx: f64, dy: f64 },
    /// Final cumulative delta
    Release { dx: f64, dy: f64 },
}

/// The offset channel a gesture drives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    #[default]
    Horizontal,
    Vertical,
}

impl Axis {
    /// Dominant axis of a delta; ties go horizontal
    #[inline]
    pub fn dominant(dx: f64, dy: f64) -> Self {
        if dy.abs() > dx.abs() {
            Axis::Vertical
        } else {
            Axis::Horizontal
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Axis::Horizontal => "horizontal",
            Axis::Vertical => "vertical",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GesturePhase {
    Idle,
    Dragging,
    /// Released; the offset is springing toward the committed item
    SnapAnimating,
}

/// Direction label reported after a release
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwipeDirection {
    Up,
    Down,
    Left,
    Right,
    None,
}

impl SwipeDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SwipeDirection::Up => "up",
            SwipeDirection::Down => "down",
            SwipeDirection::Left => "left",
            SwipeDirection::Right => "right",
            SwipeDirection::None => "none",
        }
    }
}

impl fmt::Display for SwipeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a completed release, passed to the swipe callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwipeOutcome {
    pub direction: SwipeDirection,
    pub index: usize,
}
