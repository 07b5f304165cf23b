use super::features::{SegmentAnalyzer, SegmentFeatures};
use crate::config::SpeechParams;
use crate::decode::DecodedAudio;
use crate::error::{ScreenError, ScreenResult};
use crate::export::SessionAccumulator;
use crate::state::{CancellationToken, TestState};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

pub const SENTENCES: [&str; 5] = [
    "The quick brown fox jumps over the lazy dog.",
    "We were away a year ago, and we saw a wide view of the valley.",
    "Please pack my box with five dozen liquor jugs.",
    "She sells sea shells by the sea shore.",
    "Many men, many minds; every voice tells a different story.",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeechTask {
    pub key: String,
    pub title: String,
    pub text: String,
    pub seconds: u32,
    pub repeat: u32,
}

impl SpeechTask {
    pub fn prompt(&self) -> String {
        format!("Read aloud: \"{}\"", self.text)
    }
}

/// One read-aloud task per built-in sentence.
pub fn default_tasks(params: &SpeechParams) -> Vec<SpeechTask> {
    SENTENCES
        .iter()
        .enumerate()
        .map(|(i, text)| SpeechTask {
            key: format!("test{}", i + 1),
            title: format!("Test {}", i + 1),
            text: text.to_string(),
            seconds: params.task_seconds,
            repeat: params.task_repeat,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantMeta {
    pub participant: String,
    pub session: String,
    #[serde(rename = "micDistanceCM")]
    pub mic_distance_cm: f64,
    pub recorded_at: DateTime<Utc>,
    pub device_caps: String,
}

impl Default for ParticipantMeta {
    fn default() -> Self {
        Self {
            participant: "NA".to_string(),
            session: "S1".to_string(),
            mic_distance_cm: 0.0,
            recorded_at: Utc::now(),
            device_caps: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialRecord {
    pub task: String,
    pub task_title: String,
    /// 1-based.
    pub rep: u32,
    pub text: String,
    pub features: SegmentFeatures,
    pub meta: ParticipantMeta,
}

/// Walks the participant through the read-aloud tasks, one recording at a time.
pub struct SpeechSession {
    tasks: Vec<SpeechTask>,
    analyzer: SegmentAnalyzer,
    state: TestState,
    task_index: usize,
    rep_index: u32,
    token: Option<CancellationToken>,
    results: SessionAccumulator,
}

impl SpeechSession {
    pub fn new(tasks: Vec<SpeechTask>, params: SpeechParams) -> ScreenResult<Self> {
        if tasks.is_empty() {
            return Err(ScreenError::Config("no speech tasks defined".to_string()));
        }
        Ok(Self {
            tasks,
            analyzer: SegmentAnalyzer::new(params)?,
            state: TestState::Idle,
            task_index: 0,
            rep_index: 0,
            token: None,
            results: SessionAccumulator::new(),
        })
    }

    pub fn with_default_tasks(params: SpeechParams) -> ScreenResult<Self> {
        let tasks = default_tasks(&params);
        Self::new(tasks, params)
    }

    pub fn begin(&mut self) -> ScreenResult<&SpeechTask> {
        if self.state == TestState::Active {
            return Err(ScreenError::RecordingInProgress);
        }
        self.task_index = 0;
        self.rep_index = 0;
        self.state = TestState::Armed;
        info!("🎙️  Speech test started ({} tasks)", self.tasks.len());
        Ok(&self.tasks[0])
    }

    pub fn start_recording(&mut self) -> ScreenResult<CancellationToken> {
        match self.state {
            TestState::Armed => {}
            TestState::Active => return Err(ScreenError::RecordingInProgress),
            other => {
                return Err(ScreenError::InvalidState {
                    from: other.to_string(),
                    action: "start recording",
                })
            }
        }
        let token = CancellationToken::new();
        self.token = Some(token.clone());
        self.state = TestState::Active;
        debug!(
            "Recording {} rep {}",
            self.tasks[self.task_index].key,
            self.rep_index + 1
        );
        Ok(token)
    }

    /// Scores a finished recording and moves on to the next rep or task.
    pub fn complete_recording(
        &mut self,
        audio: &DecodedAudio,
        meta: ParticipantMeta,
    ) -> ScreenResult<&TrialRecord> {
        if self.state != TestState::Active {
            return Err(ScreenError::InvalidState {
                from: self.state.to_string(),
                action: "complete a recording",
            });
        }
        self.token = None;
        self.record(audio, meta);
        self.advance();
        self.results.last().ok_or_else(|| {
            ScreenError::Validation("trial record was not stored".to_string())
        })
    }

    /// Ends the test early. A partial segment captured so far is still scored.
    pub fn stop(
        &mut self,
        partial: Option<&DecodedAudio>,
        meta: ParticipantMeta,
    ) -> Option<&TrialRecord> {
        let was_recording = self.state == TestState::Active;
        if let Some(token) = self.token.take() {
            token.cancel();
        }
        self.state = TestState::Aborted;
        info!("🛑 Speech test stopped");

        match partial {
            Some(audio) if was_recording => {
                self.record(audio, meta);
                self.results.last()
            }
            Some(_) => {
                warn!("Partial audio supplied while not recording; ignored");
                None
            }
            None => None,
        }
    }

    fn record(&mut self, audio: &DecodedAudio, meta: ParticipantMeta) {
        let task = &self.tasks[self.task_index];
        let features = self.analyzer.analyze(audio);
        info!(
            "💾 {} rep {}: {:.2}s, score {}",
            task.title,
            self.rep_index + 1,
            features.duration_secs,
            features.score.score06
        );
        self.results.push(TrialRecord {
            task: task.key.clone(),
            task_title: task.title.clone(),
            rep: self.rep_index + 1,
            text: task.text.clone(),
            features,
            meta,
        });
    }

    fn advance(&mut self) {
        self.rep_index += 1;
        if self.rep_index < self.tasks[self.task_index].repeat {
            self.state = TestState::Armed;
            return;
        }
        self.task_index += 1;
        self.rep_index = 0;
        if self.task_index >= self.tasks.len() {
            self.task_index = self.tasks.len() - 1;
            self.state = TestState::Completed;
            info!("🏁 All speech tasks complete");
        } else {
            self.state = TestState::Armed;
        }
    }

    pub fn state(&self) -> TestState {
        self.state
    }

    pub fn tasks(&self) -> &[SpeechTask] {
        &self.tasks
    }

    /// The task awaiting a recording, if the test is running.
    pub fn current_task(&self) -> Option<&SpeechTask> {
        match self.state {
            TestState::Armed | TestState::Active => self.tasks.get(self.task_index),
            _ => None,
        }
    }

    /// 1-based repetition of the current task.
    pub fn current_rep(&self) -> u32 {
        self.rep_index + 1
    }

    pub fn results(&self) -> &SessionAccumulator {
        &self.results
    }

    pub fn results_mut(&mut self) -> &mut SessionAccumulator {
        &mut self.results
    }
}
