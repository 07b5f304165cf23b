use crate::config::SpeechParams;

/// Lower bounds that keep framing sane at very low sample rates.
pub const MIN_WINDOW_SAMPLES: usize = 64;
pub const MIN_HOP_SAMPLES: usize = 32;

/// A fixed-length view into the signal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame<'a> {
    pub offset: usize,
    pub samples: &'a [f32],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameExtractor {
    pub window: usize,
    pub hop: usize,
}

impl FrameExtractor {
    pub fn new(window: usize, hop: usize) -> Self {
        Self {
            window: window.max(MIN_WINDOW_SAMPLES),
            hop: hop.max(MIN_HOP_SAMPLES),
        }
    }

    /// Converts durations (seconds) to sample counts, truncating.
    pub fn from_durations(sample_rate: u32, window_secs: f64, hop_secs: f64) -> Self {
        let sr = sample_rate as f64;
        Self::new((sr * window_secs) as usize, (sr * hop_secs) as usize)
    }

    pub fn from_params(sample_rate: u32, params: &SpeechParams) -> Self {
        Self::from_durations(
            sample_rate,
            params.frame_window_ms / 1000.0,
            params.frame_hop_ms / 1000.0,
        )
    }

    /// Windows starting at `0, hop, 2·hop, …` while a full window still fits.
    /// Each call starts over from the beginning of `signal`.
    pub fn frames<'a>(&self, signal: &'a [f32]) -> Frames<'a> {
        Frames {
            signal,
            window: self.window,
            hop: self.hop,
            next: 0,
        }
    }

    pub fn frame_count(&self, len: usize) -> usize {
        if len < self.window {
            0
        } else {
            (len - self.window) / self.hop + 1
        }
    }
}

#[derive(Debug, Clone)]
pub struct Frames<'a> {
    signal: &'a [f32],
    window: usize,
    hop: usize,
    next: usize,
}

impl<'a> Iterator for Frames<'a> {
    type Item = Frame<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let start = self.next;
        let end = start.checked_add(self.window)?;
        if end > self.signal.len() {
            return None;
        }
        self.next = start + self.hop;
        Some(Frame {
            offset: start,
            samples: &self.signal[start..end],
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = if self.next + self.window > self.signal.len() {
            0
        } else {
            (self.signal.len() - self.next - self.window) / self.hop + 1
        };
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Frames<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_floors_apply_at_tiny_sample_rates() {
        let fx = FrameExtractor::from_durations(1000, 0.030, 0.015);
        assert_eq!(fx.window, MIN_WINDOW_SAMPLES);
        assert_eq!(fx.hop, MIN_HOP_SAMPLES);
    }

    #[test]
    fn test_default_durations_at_44k() {
        let fx = FrameExtractor::from_params(44_100, &SpeechParams::default());
        assert_eq!(fx.window, 1323);
        assert_eq!(fx.hop, 661);
    }

    #[test]
    fn test_frames_overlap_and_stop_before_partial_window() {
        let signal: Vec<f32> = (0..200).map(|i| i as f32).collect();
        let fx = FrameExtractor::new(64, 32);
        let offsets: Vec<usize> = fx.frames(&signal).map(|f| f.offset).collect();
        assert_eq!(offsets, vec![0, 32, 64, 96, 128]);
        assert_eq!(fx.frame_count(signal.len()), 5);
        assert!(fx.frames(&signal).all(|f| f.samples.len() == 64));
        assert_eq!(fx.frames(&signal).len(), 5);
    }

    #[test]
    fn test_short_signal_yields_nothing() {
        let fx = FrameExtractor::new(64, 32);
        assert_eq!(fx.frames(&[0.0; 63]).count(), 0);
        assert_eq!(fx.frame_count(63), 0);
    }
}
