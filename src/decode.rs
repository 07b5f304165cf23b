use crate::error::{ScreenError, ScreenResult};
use hound::{SampleFormat, WavReader};
use std::fs::File;
use std::io::{BufReader, Cursor, Read};
use std::path::Path;
use tracing::debug;

/// A fully materialised mono recording.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedAudio {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl DecodedAudio {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            0.0
        } else {
            self.samples.len() as f64 / self.sample_rate as f64
        }
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Turns an encoded recording into mono PCM.
pub trait AudioDecoder {
    fn decode(&self, bytes: &[u8]) -> ScreenResult<DecodedAudio>;
}

/// WAV via hound. Multi-channel input keeps channel 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct WavDecoder;

impl WavDecoder {
    pub fn open<P: AsRef<Path>>(&self, path: P) -> ScreenResult<DecodedAudio> {
        let path = path.as_ref();
        debug!("Decoding WAV: {}", path.display());
        let file = File::open(path).map_err(|e| {
            ScreenError::Validation(format!("Could not open '{}': {}", path.display(), e))
        })?;
        read_wav(BufReader::new(file))
    }
}

impl AudioDecoder for WavDecoder {
    fn decode(&self, bytes: &[u8]) -> ScreenResult<DecodedAudio> {
        read_wav(Cursor::new(bytes))
    }
}

fn read_wav<R: Read>(reader: R) -> ScreenResult<DecodedAudio> {
    let mut reader = WavReader::new(reader)?;
    let spec = reader.spec();
    let channels = spec.channels.max(1) as usize;

    let interleaved: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader.samples::<f32>().collect::<Result<_, _>>()?,
        SampleFormat::Int => {
            if spec.bits_per_sample == 0 || spec.bits_per_sample > 32 {
                return Err(ScreenError::Validation(format!(
                    "Unsupported bit depth: {}",
                    spec.bits_per_sample
                )));
            }
            let scale = (1u64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<Result<_, _>>()?
        }
    };

    let samples: Vec<f32> = interleaved
        .into_iter()
        .step_by(channels)
        .map(|v| v.clamp(-1.0, 1.0))
        .collect();

    Ok(DecodedAudio::new(samples, spec.sample_rate))
}
