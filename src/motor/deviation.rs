use super::MotorStatistics;
use crate::geometry::{ReferenceLine, Sample};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum DeviationMode {
    #[default]
    #[strum(serialize = "total")]
    Total,
    #[strum(serialize = "average")]
    Average,
}

/// Samples recorded between one pointer-down and the next.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub samples: Vec<Sample>,
}

impl Stroke {
    pub fn starting_at(sample: Sample) -> Self {
        Self {
            samples: vec![sample],
        }
    }

    pub fn last(&self) -> Option<&Sample> {
        self.samples.last()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Deviation bookkeeping against a fixed reference line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeviationAnalyzer {
    line: ReferenceLine,
}

impl DeviationAnalyzer {
    pub fn new(line: ReferenceLine) -> Self {
        Self { line }
    }

    pub fn line(&self) -> &ReferenceLine {
        &self.line
    }

    #[inline]
    pub fn distance(&self, sample: &Sample) -> f64 {
        self.line.distance_to_line(sample.point())
    }

    /// Adds the sample's distance to the running area and returns it.
    pub fn accumulate(&self, stats: &mut MotorStatistics, sample: &Sample) -> f64 {
        let d = self.distance(sample);
        stats.deviation_area += d;
        d
    }

    /// Number of off-by events across all strokes. Each stroke starts from a
    /// virtual distance of 0.
    pub fn off_by_count(&self, strokes: &[Stroke], threshold: f64) -> usize {
        strokes
            .iter()
            .map(|s| count_rising_edges(s.samples.iter().map(|p| self.distance(p)), threshold))
            .sum()
    }
}

/// Counts transitions from `<= threshold` to `> threshold`.
pub fn count_rising_edges<I>(distances: I, threshold: f64) -> usize
where
    I: IntoIterator<Item = f64>,
{
    let mut last = 0.0;
    let mut count = 0;
    for d in distances {
        if d > threshold && last <= threshold {
            count += 1;
        }
        last = d;
    }
    count
}

pub fn total_sample_count(strokes: &[Stroke]) -> usize {
    strokes.iter().map(Stroke::len).sum()
}

/// Deviation value for display: the raw area, or the area per recorded sample.
pub fn displayed_deviation(deviation_area: f64, sample_count: usize, mode: DeviationMode) -> f64 {
    match mode {
        DeviationMode::Total => deviation_area,
        DeviationMode::Average => {
            if sample_count > 0 {
                deviation_area / sample_count as f64
            } else {
                0.0
            }
        }
    }
}
