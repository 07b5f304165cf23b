pub mod features;
pub mod frames;
pub mod pitch;
pub mod session;
pub mod variability;

pub use self::features::{
    series_from_frames, FeatureSeries, LevelMeter, MeterReading, SegmentAnalyzer, SegmentFeatures,
};
pub use self::frames::{Frame, FrameExtractor};
pub use self::pitch::{rms, PitchEstimator};
pub use self::session::{default_tasks, ParticipantMeta, SpeechSession, SpeechTask, TrialRecord};
pub use self::variability::{coeff_var, SpeechScore, ThresholdTable, VariabilityScorer};
