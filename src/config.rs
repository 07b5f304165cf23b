use crate::error::{ScreenError, ScreenResult};
use crate::motor::deviation::DeviationMode;
use crate::motor::score::TurnMode;
use crate::speech::variability::ThresholdTable;
use clap::{parser::ValueSource, ArgMatches, Args};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Args, Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    #[command(flatten)]
    pub motor: MotorParams,
    #[command(flatten)]
    pub speech: SpeechParams,
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MotorParams {
    // === DISPLAY ===
    #[arg(long, default_value_t = 10.0)]
    pub off_by_threshold: f64,
    #[arg(long, default_value = "total")]
    pub deviation_mode: DeviationMode,
    #[arg(long, default_value = "avgVertical")]
    pub turn_mode: TurnMode,

    // === CANVAS ===
    #[arg(long, default_value_t = 900.0)]
    pub canvas_width: f64,
    #[arg(long, default_value_t = 600.0)]
    pub canvas_height: f64,
    #[arg(long, default_value_t = 50.0)]
    pub box_size: f64,
    #[arg(long, default_value_t = 10.0)]
    pub box_margin: f64,
}

impl Default for MotorParams {
    fn default() -> Self {
        Self {
            off_by_threshold: 10.0,
            deviation_mode: DeviationMode::Total,
            turn_mode: TurnMode::AvgVertical,
            canvas_width: 900.0,
            canvas_height: 600.0,
            box_size: 50.0,
            box_margin: 10.0,
        }
    }
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechParams {
    // === FRAMING ===
    #[arg(long, default_value_t = 30.0)]
    pub frame_window_ms: f64,
    #[arg(long, default_value_t = 15.0)]
    pub frame_hop_ms: f64,

    // === PITCH ===
    #[arg(long, default_value_t = 0.005)]
    pub quiet_floor: f64,
    #[arg(long, default_value_t = 60.0)]
    pub min_f0_hz: f64,
    #[arg(long, default_value_t = 400.0)]
    pub max_f0_hz: f64,
    #[arg(long, default_value_t = 2.0)]
    pub mean_f0_window_secs: f64,

    // === SCORING ===
    #[arg(long, default_value = "0.20,0.30,0.40,0.55,0.75,1.00")]
    pub rms_cv_thresholds: String,
    #[arg(long, default_value = "0.08,0.12,0.18,0.25,0.35,0.50")]
    pub f0_cv_thresholds: String,

    // === TASKS ===
    #[arg(long, default_value_t = 8)]
    pub task_seconds: u32,
    #[arg(long, default_value_t = 1)]
    pub task_repeat: u32,
}

impl Default for SpeechParams {
    fn default() -> Self {
        Self {
            frame_window_ms: 30.0,
            frame_hop_ms: 15.0,
            quiet_floor: 0.005,
            min_f0_hz: 60.0,
            max_f0_hz: 400.0,
            mean_f0_window_secs: 2.0,
            rms_cv_thresholds: "0.20,0.30,0.40,0.55,0.75,1.00".to_string(),
            f0_cv_thresholds: "0.08,0.12,0.18,0.25,0.35,0.50".to_string(),
            task_seconds: 8,
            task_repeat: 1,
        }
    }
}

impl SpeechParams {
    pub fn rms_table(&self) -> ScreenResult<ThresholdTable> {
        parse_f64_array::<6>(&self.rms_cv_thresholds, "rms_cv_thresholds")
            .and_then(|b| ThresholdTable::new(b.to_vec()))
    }

    pub fn f0_table(&self) -> ScreenResult<ThresholdTable> {
        parse_f64_array::<6>(&self.f0_cv_thresholds, "f0_cv_thresholds")
            .and_then(|b| ThresholdTable::new(b.to_vec()))
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> ScreenResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            ScreenError::Config(format!("Failed to read config '{}': {}", path.display(), e))
        })?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Overlays only the options the user actually typed on the command line.
    pub fn merge_from_cli(&mut self, cli: &Config, matches: &ArgMatches) {
        macro_rules! update_if_present {
            ($group:ident . $field:ident) => {
                if matches.value_source(stringify!($field)) == Some(ValueSource::CommandLine) {
                    self.$group.$field = cli.$group.$field.clone();
                }
            };
        }

        update_if_present!(motor.off_by_threshold);
        update_if_present!(motor.deviation_mode);
        update_if_present!(motor.turn_mode);
        update_if_present!(motor.canvas_width);
        update_if_present!(motor.canvas_height);
        update_if_present!(motor.box_size);
        update_if_present!(motor.box_margin);

        update_if_present!(speech.frame_window_ms);
        update_if_present!(speech.frame_hop_ms);
        update_if_present!(speech.quiet_floor);
        update_if_present!(speech.min_f0_hz);
        update_if_present!(speech.max_f0_hz);
        update_if_present!(speech.mean_f0_window_secs);
        update_if_present!(speech.rms_cv_thresholds);
        update_if_present!(speech.f0_cv_thresholds);
        update_if_present!(speech.task_seconds);
        update_if_present!(speech.task_repeat);
    }

    pub fn validate(&self) -> ScreenResult<()> {
        let m = &self.motor;
        require_positive(m.off_by_threshold, "off_by_threshold")?;
        require_positive(m.canvas_width, "canvas_width")?;
        require_positive(m.canvas_height, "canvas_height")?;
        require_positive(m.box_size, "box_size")?;
        if m.box_margin < 0.0 || !m.box_margin.is_finite() {
            return Err(ScreenError::Config(
                "box_margin must be a non-negative number".to_string(),
            ));
        }
        if 2.0 * (m.box_size + m.box_margin) > m.canvas_width.min(m.canvas_height) {
            return Err(ScreenError::Config(
                "target boxes do not fit on the canvas".to_string(),
            ));
        }

        let s = &self.speech;
        require_positive(s.frame_window_ms, "frame_window_ms")?;
        require_positive(s.frame_hop_ms, "frame_hop_ms")?;
        require_positive(s.quiet_floor, "quiet_floor")?;
        require_positive(s.min_f0_hz, "min_f0_hz")?;
        require_positive(s.mean_f0_window_secs, "mean_f0_window_secs")?;
        if s.max_f0_hz <= s.min_f0_hz {
            return Err(ScreenError::Config(format!(
                "max_f0_hz ({}) must exceed min_f0_hz ({})",
                s.max_f0_hz, s.min_f0_hz
            )));
        }
        if s.task_repeat == 0 {
            return Err(ScreenError::Config("task_repeat must be at least 1".to_string()));
        }
        s.rms_table()?;
        s.f0_table()?;
        Ok(())
    }
}

fn require_positive(v: f64, name: &str) -> ScreenResult<()> {
    if v.is_finite() && v > 0.0 {
        Ok(())
    } else {
        Err(ScreenError::Config(format!(
            "--{} must be a positive number, got {}",
            name, v
        )))
    }
}

fn parse_f64_array<const N: usize>(s: &str, name: &str) -> ScreenResult<[f64; N]> {
    let parts: Vec<&str> = s.split(',').collect();
    if parts.len() != N {
        return Err(ScreenError::Config(format!(
            "--{} requires {} values",
            name, N
        )));
    }
    let mut arr = [0.0; N];
    for (i, p) in parts.iter().enumerate() {
        arr[i] = p
            .trim()
            .parse()
            .map_err(|_| ScreenError::Config(format!("Invalid number in {}: '{}'", name, p)))?;
    }
    Ok(arr)
}
