use super::turns::Axis;
use super::MotorStatistics;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

pub const MAX_SUBSCORE: f64 = 4.0;
pub const DEVIATION_SCALE: f64 = 500.0;
pub const TURN_SCALE: f64 = 150.0;
pub const DISCONTINUITY_SCALE: f64 = 5.0;
pub const BOUNDS_SCALE: f64 = 3.0;

/// Which axis supplies the "turn height" feature.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
#[strum(ascii_case_insensitive)]
pub enum TurnMode {
    #[default]
    #[strum(serialize = "avgVertical")]
    #[serde(rename = "avgVertical")]
    AvgVertical,
    #[strum(serialize = "avgHorizontal")]
    #[serde(rename = "avgHorizontal")]
    AvgHorizontal,
}

impl TurnMode {
    pub fn axis(&self) -> Axis {
        match self {
            TurnMode::AvgVertical => Axis::Vertical,
            TurnMode::AvgHorizontal => Axis::Horizontal,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TurnMode::AvgVertical => "Avg Vertical",
            TurnMode::AvgHorizontal => "Avg Horizontal",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Display, EnumIter, Serialize)]
pub enum SeverityBand {
    #[strum(to_string = "Normal, smooth, accurate movement")]
    Normal,
    #[strum(to_string = "Slight tremor or inaccuracy, but target achieved")]
    Slight,
    #[strum(to_string = "Moderate tremor; instability present but functional")]
    Moderate,
    #[strum(to_string = "Severe tremor; frequent overshoot or instability")]
    Severe,
    #[strum(to_string = "Inability to reach target or complete task")]
    Inability,
}

impl SeverityBand {
    /// Closed-open bands of width 1 centred on the integer grades.
    pub fn from_score(score: f64) -> Self {
        if score < 0.5 {
            SeverityBand::Normal
        } else if score < 1.5 {
            SeverityBand::Slight
        } else if score < 2.5 {
            SeverityBand::Moderate
        } else if score < 3.5 {
            SeverityBand::Severe
        } else {
            SeverityBand::Inability
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotorScore {
    pub score_dev: f64,
    pub score_turn: f64,
    pub score_dis: f64,
    pub score_bounds: f64,
    pub sara_score: f64,
    pub band: SeverityBand,
}

impl MotorScore {
    pub fn description(&self) -> String {
        self.band.to_string()
    }

    pub fn summary(&self, completed_at: DateTime<Utc>) -> ClinicalSummary {
        ClinicalSummary {
            score_dev: round2(self.score_dev),
            score_turn: round2(self.score_turn),
            score_dis: round2(self.score_dis),
            score_bounds: round2(self.score_bounds),
            sara_score: round2(self.sara_score),
            description: self.description(),
            completed_at,
        }
    }
}

/// The scored outcome in its exported shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClinicalSummary {
    pub score_dev: f64,
    pub score_turn: f64,
    pub score_dis: f64,
    pub score_bounds: f64,
    pub sara_score: f64,
    pub description: String,
    pub completed_at: DateTime<Utc>,
}

pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[inline]
fn bounded(v: f64) -> f64 {
    v.clamp(0.0, MAX_SUBSCORE)
}

/// Turns frozen statistics into the four subscores and the composite.
pub struct MotorScoreAggregator {
    pub turn_mode: TurnMode,
}

impl MotorScoreAggregator {
    pub fn new(turn_mode: TurnMode) -> Self {
        Self { turn_mode }
    }

    pub fn score(&self, stats: &MotorStatistics) -> MotorScore {
        let turn_height = stats.turn_count(self.turn_mode.axis()) as f64;
        // "Reverses" is always the horizontal count, whichever axis is selected above.
        let reverses = stats.turn_count(Axis::Horizontal) as f64;

        let score_dev = bounded(stats.deviation_area / DEVIATION_SCALE);
        let score_turn = bounded(turn_height / TURN_SCALE);
        let score_dis = bounded((stats.discontinuities as f64 + reverses) / DISCONTINUITY_SCALE);
        let score_bounds =
            bounded((stats.out_of_bounds as f64 + stats.start_fails as f64) / BOUNDS_SCALE);
        let sara_score = (score_dev + score_turn + score_dis + score_bounds) / 4.0;

        MotorScore {
            score_dev,
            score_turn,
            score_dis,
            score_bounds,
            sara_score,
            band: SeverityBand::from_score(sara_score),
        }
    }
}
