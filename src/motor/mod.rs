pub mod deviation;
pub mod score;
pub mod session;
pub mod turns;

pub use self::deviation::{DeviationAnalyzer, DeviationMode, Stroke};
pub use self::score::{ClinicalSummary, MotorScore, MotorScoreAggregator, SeverityBand, TurnMode};
pub use self::session::{
    ArmedTest, MotorEvent, MotorObserver, MotorOutcome, MotorSession, PointerEvent,
};
pub use self::turns::{Axis, Turn, TurnDetector};

use serde::{Deserialize, Serialize};

/// Running aggregate for one drawing attempt.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MotorStatistics {
    pub deviation_area: f64,
    pub discontinuities: u32,
    pub out_of_bounds: u32,
    pub start_fails: u32,
    pub turns: Vec<Turn>,
}

impl MotorStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn turn_count(&self, axis: Axis) -> usize {
        self.turns.iter().filter(|t| t.axis == axis).count()
    }

    pub fn horizontal_turns(&self) -> usize {
        self.turn_count(Axis::Horizontal)
    }

    pub fn vertical_turns(&self) -> usize {
        self.turn_count(Axis::Vertical)
    }

    pub fn average_turn_distance(&self, axis: Axis) -> f64 {
        turns::average_turn_distance(&self.turns, axis)
    }
}
