//! Autocorrelation pitch estimation.
//!
//! Works well on clean sustained vowels; it is a heuristic, not a tracker.
//! There is no octave-error correction and no interpolation between lags.

use crate::config::SpeechParams;

/// Root-mean-square amplitude, 0 for an empty slice.
pub fn rms(samples: &[f32]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let energy: f64 = samples.iter().map(|&v| (v as f64) * (v as f64)).sum();
    (energy / samples.len() as f64).sqrt()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PitchEstimator {
    pub sample_rate: u32,
    /// Shortest period searched (highest F0).
    pub min_lag: usize,
    /// Longest period searched (lowest F0).
    pub max_lag: usize,
}

impl PitchEstimator {
    pub fn new(sample_rate: u32, min_f0_hz: f64, max_f0_hz: f64) -> Self {
        let sr = sample_rate as f64;
        Self {
            sample_rate,
            min_lag: (sr / max_f0_hz).floor() as usize,
            max_lag: (sr / min_f0_hz).floor() as usize,
        }
    }

    pub fn from_params(sample_rate: u32, params: &SpeechParams) -> Self {
        Self::new(sample_rate, params.min_f0_hz, params.max_f0_hz)
    }

    /// Fundamental frequency of `frame` in Hz, or `None` when no lag inside the
    /// vocal band shows positive correlation.
    ///
    /// A non-positive peak counts as unvoiced rather than picking the band's
    /// first lag, so silence yields `None` instead of `sr / min_lag`.
    pub fn estimate(&self, frame: &[f32]) -> Option<f64> {
        let n = frame.len();
        if n < 2 {
            return None;
        }
        let lower = self.min_lag.max(1);
        let upper = self.max_lag.min(n - 1);
        if lower > upper {
            return None;
        }

        let mean = frame.iter().map(|&v| v as f64).sum::<f64>() / n as f64;
        let x: Vec<f64> = frame.iter().map(|&v| v as f64 - mean).collect();

        // Lags outside the band can never win, so only the band is summed.
        let mut best_lag = 0usize;
        let mut best_val = 0.0f64;
        for lag in lower..=upper {
            let corr: f64 = x[..n - lag]
                .iter()
                .zip(&x[lag..])
                .map(|(a, b)| a * b)
                .sum();
            if corr > best_val {
                best_val = corr;
                best_lag = lag;
            }
        }

        if best_lag > 0 {
            Some(self.sample_rate as f64 / best_lag as f64)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn sine(freq: f32, sample_rate: u32, len: usize, amp: f32) -> Vec<f32> {
        (0..len)
            .map(|i| (2.0 * PI * freq * i as f32 / sample_rate as f32).sin() * amp)
            .collect()
    }

    #[test]
    fn test_lag_bounds_follow_vocal_band() {
        let p = PitchEstimator::new(44_100, 60.0, 400.0);
        assert_eq!(p.min_lag, 110);
        assert_eq!(p.max_lag, 735);
    }

    #[test]
    fn test_recovers_150hz_sine_in_30ms_window() {
        let p = PitchEstimator::new(44_100, 60.0, 400.0);
        let frame = sine(150.0, 44_100, 1323, 0.5);
        let f0 = p.estimate(&frame).expect("sine should be voiced");
        assert!((f0 - 150.0).abs() <= 5.0, "estimated {}", f0);
    }

    #[test]
    fn test_silence_has_no_pitch() {
        let p = PitchEstimator::new(16_000, 60.0, 400.0);
        assert_eq!(p.estimate(&[0.0; 480]), None);
    }

    #[test]
    fn test_frame_shorter_than_band_has_no_pitch() {
        let p = PitchEstimator::new(44_100, 60.0, 400.0);
        assert_eq!(p.estimate(&sine(150.0, 44_100, 100, 0.5)), None);
    }

    #[test]
    fn test_rms_of_constant_signal() {
        assert!((rms(&[0.5; 10]) - 0.5).abs() < 1e-9);
        assert_eq!(rms(&[]), 0.0);
    }
}
