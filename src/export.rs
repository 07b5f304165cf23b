use crate::error::{ScreenError, ScreenResult};
use crate::motor::score::ClinicalSummary;
use crate::motor::{DeviationMode, MotorSession, TurnMode};
use crate::speech::features::SegmentFeatures;
use crate::speech::session::{ParticipantMeta, TrialRecord};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;
use tracing::info;

pub const CSV_HEADER: [&str; 14] = [
    "participant",
    "session",
    "test",
    "duration_s",
    "mean_rms",
    "rms_cv",
    "mean_f0_hz",
    "f0_cv",
    "score_0_6",
    "sample_rate",
    "mic_cm",
    "recorded_at",
    "device_caps",
    "text",
];

fn fixed(v: Option<f64>, digits: usize) -> String {
    match v {
        Some(x) if x.is_finite() => format!("{:.*}", digits, x),
        _ => String::new(),
    }
}

/// Speech trials collected over one session, in recording order.
#[derive(Debug, Clone, Default)]
pub struct SessionAccumulator {
    records: Vec<TrialRecord>,
}

#[derive(Debug, Serialize)]
struct TrialDocument<'a> {
    test: &'a str,
    duration: f64,
    features: TrialFeatures<'a>,
    text: &'a str,
}

/// Flat feature block of the JSON export, with participant metadata alongside.
#[derive(Debug, Serialize)]
struct TrialFeatures<'a> {
    #[serde(rename = "meanRMS")]
    mean_rms: f64,
    #[serde(rename = "meanF0")]
    mean_f0: Option<f64>,
    #[serde(rename = "rmsCV")]
    rms_cv: Option<f64>,
    #[serde(rename = "f0CV")]
    f0_cv: Option<f64>,
    score06: u8,
    #[serde(rename = "sampleRate")]
    sample_rate: u32,
    #[serde(flatten)]
    meta: &'a ParticipantMeta,
}

impl<'a> TrialFeatures<'a> {
    fn new(f: &SegmentFeatures, meta: &'a ParticipantMeta) -> Self {
        let finite = |v: Option<f64>| v.filter(|x| x.is_finite());
        Self {
            mean_rms: f.mean_rms,
            mean_f0: finite(f.mean_f0),
            rms_cv: finite(f.score.rms_cv),
            f0_cv: finite(f.score.f0_cv),
            score06: f.score.score06,
            sample_rate: f.sample_rate,
            meta,
        }
    }
}

impl SessionAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: TrialRecord) {
        self.records.push(record);
    }

    pub fn last(&self) -> Option<&TrialRecord> {
        self.records.last()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrialRecord> {
        self.records.iter()
    }

    pub fn records(&self) -> &[TrialRecord] {
        &self.records
    }

    /// Participant of the first trial, or "session" when nothing is recorded.
    fn file_stem(&self) -> String {
        self.records
            .first()
            .map(|r| r.meta.participant.clone())
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| "session".to_string())
    }

    pub fn csv_file_name(&self) -> String {
        format!("{}_speech_reading.csv", self.file_stem())
    }

    pub fn json_file_name(&self) -> String {
        format!("{}_speech_reading.json", self.file_stem())
    }

    /// One row per trial. Undefined metrics are written as empty cells.
    pub fn write_csv<W: Write>(&self, writer: W) -> ScreenResult<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(CSV_HEADER)?;
        for r in &self.records {
            let f = &r.features;
            wtr.write_record([
                r.meta.participant.clone(),
                r.meta.session.clone(),
                r.task_title.clone(),
                format!("{:.3}", f.duration_secs),
                fixed(Some(f.mean_rms), 6),
                fixed(f.score.rms_cv, 6),
                fixed(f.mean_f0, 2),
                fixed(f.score.f0_cv, 6),
                f.score.score06.to_string(),
                f.sample_rate.to_string(),
                r.meta.mic_distance_cm.to_string(),
                r.meta
                    .recorded_at
                    .to_rfc3339_opts(SecondsFormat::Millis, true),
                r.meta.device_caps.clone(),
                r.text.clone(),
            ])?;
        }
        wtr.flush()?;
        info!("📄 Wrote {} trial rows (CSV)", self.records.len());
        Ok(())
    }

    pub fn write_json<W: Write>(&self, writer: W) -> ScreenResult<()> {
        let docs: Vec<TrialDocument> = self
            .records
            .iter()
            .map(|r| TrialDocument {
                test: &r.task_title,
                duration: r.features.duration_secs,
                features: TrialFeatures::new(&r.features, &r.meta),
                text: &r.text,
            })
            .collect();
        serde_json::to_writer_pretty(writer, &docs)?;
        info!("📄 Wrote {} trials (JSON)", docs.len());
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    pub name: String,
    pub id: String,
}

impl Patient {
    pub fn new(name: &str, id: &str) -> Self {
        Self {
            name: name.to_string(),
            id: id.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MotorExportStats {
    pub discontinuities: u32,
    pub vertical_turns: usize,
    pub deviation_area: f64,
    pub horizontal_turns: usize,
    pub out_of_bounds: u32,
    pub start_fails: u32,
    pub off_by_threshold: f64,
    pub off_by_count: usize,
    pub deviation_mode: DeviationMode,
    pub deviation_shown: f64,
    pub turn_mode: TurnMode,
    pub turn_shown: f64,
    pub clinical: ClinicalSummary,
}

/// The motor test result document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotorExport {
    pub patient: Patient,
    pub test: String,
    pub timestamp: DateTime<Utc>,
    pub stats: MotorExportStats,
}

impl MotorExport {
    /// Snapshots a session. An attempt still in progress is scored as it stands.
    pub fn from_session(session: &MotorSession, patient: &Patient) -> ScreenResult<Self> {
        let test = session.test().ok_or(ScreenError::NotArmed)?;
        let params = session.params();
        let stats = session.statistics();
        let now = Utc::now();
        let clinical = match session.outcome() {
            Some(o) => o.score.summary(o.completed_at),
            None => session.current_score().summary(now),
        };

        Ok(Self {
            patient: patient.clone(),
            test: test.name.clone(),
            timestamp: now,
            stats: MotorExportStats {
                discontinuities: stats.discontinuities,
                vertical_turns: stats.vertical_turns(),
                deviation_area: stats.deviation_area,
                horizontal_turns: stats.horizontal_turns(),
                out_of_bounds: stats.out_of_bounds,
                start_fails: stats.start_fails,
                off_by_threshold: params.off_by_threshold,
                off_by_count: session.off_by_count(params.off_by_threshold)?,
                deviation_mode: params.deviation_mode,
                deviation_shown: session.displayed_deviation(),
                turn_mode: params.turn_mode,
                turn_shown: session.displayed_turn(),
                clinical,
            },
        })
    }

    pub fn file_name(&self) -> String {
        format!(
            "ataxia_data_{}_{}.json",
            self.patient.id,
            self.timestamp.timestamp_millis()
        )
    }

    pub fn write_json<W: Write>(&self, writer: W) -> ScreenResult<()> {
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }
}
