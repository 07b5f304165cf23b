use crate::error::{ScreenError, ScreenResult};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Coefficient of variation (population SD over mean) of the finite,
/// strictly positive values. `None` when nothing qualifies.
pub fn coeff_var(series: &[f64]) -> Option<f64> {
    let valid: Vec<f64> = series
        .iter()
        .copied()
        .filter(|v| v.is_finite() && *v > 0.0)
        .collect();
    if valid.is_empty() {
        return None;
    }
    let n = valid.len() as f64;
    let mean = valid.iter().sum::<f64>() / n;
    if mean <= 0.0 || !mean.is_finite() {
        return None;
    }
    let variance = valid.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
    let cv = variance.sqrt() / mean;
    cv.is_finite().then_some(cv)
}

/// Ascending bucket boundaries. A metric lands in the first bucket whose
/// boundary it does not exceed; past the last boundary, or undefined, it lands
/// in the worst bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdTable {
    bounds: Vec<f64>,
}

impl ThresholdTable {
    pub fn new(bounds: Vec<f64>) -> ScreenResult<Self> {
        if bounds.is_empty() {
            return Err(ScreenError::Config(
                "threshold table must not be empty".to_string(),
            ));
        }
        if bounds.iter().any(|b| !b.is_finite()) {
            return Err(ScreenError::Config(format!(
                "threshold table contains a non-finite value: {:?}",
                bounds
            )));
        }
        if bounds.windows(2).any(|w| w[0] >= w[1]) {
            return Err(ScreenError::Config(format!(
                "threshold table must be strictly ascending: {:?}",
                bounds
            )));
        }
        Ok(Self { bounds })
    }

    pub fn default_rms() -> Self {
        Self {
            bounds: vec![0.20, 0.30, 0.40, 0.55, 0.75, 1.00],
        }
    }

    pub fn default_f0() -> Self {
        Self {
            bounds: vec![0.08, 0.12, 0.18, 0.25, 0.35, 0.50],
        }
    }

    pub fn bounds(&self) -> &[f64] {
        &self.bounds
    }

    pub fn worst(&self) -> u8 {
        self.bounds.len() as u8
    }

    pub fn bucket(&self, metric: Option<f64>) -> u8 {
        match metric {
            Some(v) if v.is_finite() => self
                .bounds
                .iter()
                .position(|&b| v <= b)
                .map_or(self.worst(), |i| i as u8),
            _ => self.worst(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeechScore {
    pub rms_cv: Option<f64>,
    pub f0_cv: Option<f64>,
    pub rms_bucket: u8,
    pub f0_bucket: u8,
    pub score06: u8,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariabilityScorer {
    pub rms_table: ThresholdTable,
    pub f0_table: ThresholdTable,
}

impl Default for VariabilityScorer {
    fn default() -> Self {
        Self {
            rms_table: ThresholdTable::default_rms(),
            f0_table: ThresholdTable::default_f0(),
        }
    }
}

impl VariabilityScorer {
    pub fn new(rms_table: ThresholdTable, f0_table: ThresholdTable) -> Self {
        Self {
            rms_table,
            f0_table,
        }
    }

    pub fn score(&self, rms_series: &[f64], f0_series: &[f64]) -> SpeechScore {
        let rms_cv = coeff_var(rms_series);
        let f0_cv = coeff_var(f0_series);
        if rms_cv.is_none() || f0_cv.is_none() {
            debug!(
                "Undefined CV (rms: {:?}, f0: {:?}); scoring as worst bucket",
                rms_cv, f0_cv
            );
        }
        let rms_bucket = self.rms_table.bucket(rms_cv);
        let f0_bucket = self.f0_table.bucket(f0_cv);
        SpeechScore {
            rms_cv,
            f0_cv,
            rms_bucket,
            f0_bucket,
            score06: composite(rms_bucket, f0_bucket),
        }
    }
}

/// Mean of the two buckets, halves rounded up.
pub fn composite(rms_bucket: u8, f0_bucket: u8) -> u8 {
    ((rms_bucket as f64 + f0_bucket as f64) / 2.0).round() as u8
}
