use crate::geometry::Sample;
use serde::{Deserialize, Serialize};
use strum_macros::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    #[strum(serialize = "horizontal")]
    Horizontal,
    #[strum(serialize = "vertical")]
    Vertical,
}

/// A reversal of movement along one axis, tagged with the deviation at the
/// sample where it happened.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub axis: Axis,
    pub distance: f64,
}

#[inline]
fn sign(delta: f64) -> i8 {
    if delta > 0.0 {
        1
    } else if delta < 0.0 {
        -1
    } else {
        0
    }
}

/// Tracks the last non-zero movement sign per axis.
///
/// A turn is emitted only when a non-zero sign flips to the opposite non-zero
/// sign. Stationary steps (delta 0) leave the remembered direction untouched,
/// and the first movement on an axis only establishes the direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TurnDetector {
    last_dx: i8,
    last_dy: i8,
}

impl TurnDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Compares one pair of consecutive samples. Each axis is evaluated
    /// independently, so a single step yields zero, one or two turns.
    pub fn observe(
        &mut self,
        prev: &Sample,
        cur: &Sample,
        distance: f64,
    ) -> impl Iterator<Item = Turn> {
        let horizontal = Self::step(&mut self.last_dx, sign(cur.x - prev.x)).then_some(Turn {
            axis: Axis::Horizontal,
            distance,
        });
        let vertical = Self::step(&mut self.last_dy, sign(cur.y - prev.y)).then_some(Turn {
            axis: Axis::Vertical,
            distance,
        });
        [horizontal, vertical].into_iter().flatten()
    }

    fn step(last: &mut i8, now: i8) -> bool {
        if now == 0 {
            return false;
        }
        let flipped = *last != 0 && *last != now;
        *last = now;
        flipped
    }
}

/// Mean distance of the turns on `axis`, 0 when there are none.
pub fn average_turn_distance(turns: &[Turn], axis: Axis) -> f64 {
    let (sum, count) = turns
        .iter()
        .filter(|t| t.axis == axis)
        .fold((0.0, 0usize), |(s, c), t| (s + t.distance, c + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}
