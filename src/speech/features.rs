use super::frames::FrameExtractor;
use super::pitch::{rms, PitchEstimator};
use super::variability::{SpeechScore, VariabilityScorer};
use crate::config::SpeechParams;
use crate::decode::DecodedAudio;
use crate::error::ScreenResult;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Frame-wise series. F0 only holds voiced frames, RMS holds every frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureSeries {
    pub rms: Vec<f64>,
    pub f0: Vec<f64>,
}

pub fn series_from_frames(
    signal: &[f32],
    extractor: &FrameExtractor,
    pitch: &PitchEstimator,
    quiet_floor: f64,
) -> FeatureSeries {
    let mut series = FeatureSeries::default();
    for frame in extractor.frames(signal) {
        let level = rms(frame.samples);
        series.rms.push(level);
        if level > quiet_floor {
            if let Some(f0) = pitch.estimate(frame.samples).filter(|f| f.is_finite()) {
                series.f0.push(f0);
            }
        }
    }
    series
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SegmentFeatures {
    pub duration_secs: f64,
    pub sample_rate: u32,
    pub mean_rms: f64,
    pub mean_f0: Option<f64>,
    pub frame_count: usize,
    pub voiced_frames: usize,
    pub score: SpeechScore,
}

/// Turns one decoded recording into features and a 0–6 score.
#[derive(Debug, Clone)]
pub struct SegmentAnalyzer {
    params: SpeechParams,
    scorer: VariabilityScorer,
}

impl SegmentAnalyzer {
    pub fn new(params: SpeechParams) -> ScreenResult<Self> {
        let scorer = VariabilityScorer::new(params.rms_table()?, params.f0_table()?);
        Ok(Self { params, scorer })
    }

    pub fn params(&self) -> &SpeechParams {
        &self.params
    }

    pub fn analyze(&self, audio: &DecodedAudio) -> SegmentFeatures {
        let sr = audio.sample_rate;
        let extractor = FrameExtractor::from_params(sr, &self.params);
        let pitch = PitchEstimator::from_params(sr, &self.params);

        let head_len = ((sr as f64 * self.params.mean_f0_window_secs) as usize)
            .min(audio.samples.len());
        let mean_rms = rms(&audio.samples);
        let mean_f0 = pitch.estimate(&audio.samples[..head_len]);

        let series = series_from_frames(&audio.samples, &extractor, &pitch, self.params.quiet_floor);
        let score = self.scorer.score(&series.rms, &series.f0);

        debug!(
            "Segment: {:.2}s, {} frames ({} voiced), rmsCV {:?}, f0CV {:?} -> {}",
            audio.duration_secs(),
            series.rms.len(),
            series.f0.len(),
            score.rms_cv,
            score.f0_cv,
            score.score06
        );

        SegmentFeatures {
            duration_secs: audio.duration_secs(),
            sample_rate: sr,
            mean_rms,
            mean_f0,
            frame_count: series.rms.len(),
            voiced_frames: series.f0.len(),
            score,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeterReading {
    pub rms: f64,
    pub f0: Option<f64>,
    /// Bar fill fraction in `[0, 1]`.
    pub fill: f64,
}

/// Live level/pitch readout for periodic capture blocks.
#[derive(Debug, Clone, Copy)]
pub struct LevelMeter {
    pitch: PitchEstimator,
}

impl LevelMeter {
    pub fn new(sample_rate: u32, params: &SpeechParams) -> Self {
        Self {
            pitch: PitchEstimator::from_params(sample_rate, params),
        }
    }

    pub fn observe(&self, block: &[f32]) -> MeterReading {
        let level = rms(block);
        MeterReading {
            rms: level,
            f0: self.pitch.estimate(block),
            fill: (level * 10.0).min(1.0),
        }
    }
}
