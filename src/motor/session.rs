use super::deviation::{self, DeviationAnalyzer, DeviationMode, Stroke};
use super::score::{MotorScore, MotorScoreAggregator, TurnMode};
use super::turns::TurnDetector;
use super::MotorStatistics;
use crate::config::MotorParams;
use crate::error::{ScreenError, ScreenResult};
use crate::geometry::{Canvas, MotorTestKind, ReferenceLine, Sample, TargetBox};
use crate::state::TestState;
use chrono::{DateTime, Utc};
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq)]
pub enum MotorEvent {
    Armed { test: String },
    StartHit,
    StatsUpdated,
    Completed(MotorScore),
    Aborted(MotorScore),
}

/// Raw input from the drawing surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down(Sample),
    Move(Sample),
    Up,
    Leave,
}

pub trait MotorObserver {
    fn on_event(&mut self, event: &MotorEvent);
}

impl<F: FnMut(&MotorEvent)> MotorObserver for F {
    fn on_event(&mut self, event: &MotorEvent) {
        self(event)
    }
}

#[derive(Debug, Clone)]
pub struct ArmedTest {
    pub name: String,
    pub kind: Option<MotorTestKind>,
    pub start: TargetBox,
    pub finish: TargetBox,
    analyzer: DeviationAnalyzer,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotorOutcome {
    pub score: MotorScore,
    pub completed_at: DateTime<Utc>,
    pub aborted: bool,
}

/// One line-drawing test attempt, driven by pointer events.
pub struct MotorSession {
    params: MotorParams,
    canvas: Canvas,
    state: TestState,
    test: Option<ArmedTest>,
    stats: MotorStatistics,
    strokes: Vec<Stroke>,
    detector: TurnDetector,
    pointer_down: bool,
    can_draw: bool,
    start_hit: bool,
    outcome: Option<MotorOutcome>,
    observers: Vec<Box<dyn MotorObserver>>,
}

impl MotorSession {
    pub fn new(params: MotorParams) -> Self {
        let canvas = Canvas::from_params(&params);
        Self {
            params,
            canvas,
            state: TestState::Idle,
            test: None,
            stats: MotorStatistics::new(),
            strokes: Vec::new(),
            detector: TurnDetector::new(),
            pointer_down: false,
            can_draw: false,
            start_hit: false,
            outcome: None,
            observers: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, observer: Box<dyn MotorObserver>) {
        self.observers.push(observer);
    }

    fn emit(&mut self, event: MotorEvent) {
        for o in self.observers.iter_mut() {
            o.on_event(&event);
        }
    }

    // --- Lifecycle ---

    /// Places the targets of a preset test. Any previous attempt is discarded.
    pub fn arm(&mut self, kind: MotorTestKind) {
        let (start, finish) = kind.targets(&self.canvas);
        self.arm_targets(kind.title().to_string(), Some(kind), start, finish);
    }

    pub fn arm_custom(&mut self, name: &str, start: TargetBox, finish: TargetBox) {
        self.arm_targets(name.to_string(), None, start, finish);
    }

    fn arm_targets(
        &mut self,
        name: String,
        kind: Option<MotorTestKind>,
        start: TargetBox,
        finish: TargetBox,
    ) {
        let analyzer = DeviationAnalyzer::new(ReferenceLine::between(&start, &finish));
        info!("🎯 Armed '{}'", name);
        self.test = Some(ArmedTest {
            name: name.clone(),
            kind,
            start,
            finish,
            analyzer,
        });
        self.clear_attempt();
        self.state = TestState::Armed;
        self.emit(MotorEvent::Armed { test: name });
    }

    /// Enters Active with a fresh aggregate. Also restarts a finished attempt.
    pub fn begin(&mut self) -> ScreenResult<()> {
        if self.test.is_none() {
            return Err(ScreenError::NotArmed);
        }
        self.clear_attempt();
        self.state = TestState::Active;
        debug!("Motor attempt started");
        Ok(())
    }

    /// Arms a preset and goes straight to Active.
    pub fn start(&mut self, kind: MotorTestKind) {
        self.arm(kind);
        self.state = TestState::Active;
    }

    /// Retries the same targets from scratch.
    pub fn reset(&mut self) -> ScreenResult<()> {
        info!("🔄 Resetting attempt");
        self.begin()
    }

    fn clear_attempt(&mut self) {
        self.stats.reset();
        self.strokes.clear();
        self.detector.reset();
        self.pointer_down = false;
        self.can_draw = false;
        self.start_hit = false;
        self.outcome = None;
    }

    /// Ends the attempt early. What was accumulated is scored, not discarded.
    pub fn stop(&mut self) -> ScreenResult<MotorScore> {
        if self.test.is_none() {
            return Err(ScreenError::NotArmed);
        }
        if let Some(outcome) = self.outcome {
            return Ok(outcome.score);
        }
        self.pointer_down = false;
        self.can_draw = false;
        let score = self.freeze(true);
        info!(
            "🛑 Attempt aborted; SARA {:.2} ({})",
            score.sara_score, score.band
        );
        self.emit(MotorEvent::Aborted(score));
        Ok(score)
    }

    fn freeze(&mut self, aborted: bool) -> MotorScore {
        let score = MotorScoreAggregator::new(self.params.turn_mode).score(&self.stats);
        self.outcome = Some(MotorOutcome {
            score,
            completed_at: Utc::now(),
            aborted,
        });
        self.state = if aborted {
            TestState::Aborted
        } else {
            TestState::Completed
        };
        score
    }

    // --- Pointer protocol ---

    fn accepting(&self) -> Option<&ArmedTest> {
        if self.state == TestState::Active {
            self.test.as_ref()
        } else {
            None
        }
    }

    pub fn handle(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Down(s) => self.pointer_down(s),
            PointerEvent::Move(s) => self.pointer_move(s),
            PointerEvent::Up => self.pointer_up(),
            PointerEvent::Leave => self.pointer_leave(),
        }
    }

    pub fn pointer_down(&mut self, sample: Sample) {
        let Some(test) = self.accepting() else {
            return;
        };
        let in_start = test.start.contains(sample.x, sample.y);
        let analyzer = test.analyzer;
        self.pointer_down = true;

        if in_start {
            if self.start_hit {
                self.stats.discontinuities += 1;
            } else {
                self.start_hit = true;
                self.can_draw = true;
                debug!("Start target hit at ({:.1}, {:.1})", sample.x, sample.y);
                self.emit(MotorEvent::StartHit);
            }
            self.strokes.push(Stroke::starting_at(sample));
        } else if !self.start_hit {
            self.stats.start_fails += 1;
        } else {
            self.stats.discontinuities += 1;
            self.strokes.push(Stroke::starting_at(sample));
            analyzer.accumulate(&mut self.stats, &sample);
        }
        self.emit(MotorEvent::StatsUpdated);
    }

    pub fn pointer_move(&mut self, sample: Sample) {
        if !(self.pointer_down && self.can_draw) {
            return;
        }
        let Some(test) = self.accepting() else {
            return;
        };
        let analyzer = test.analyzer;
        let reached_finish = test.finish.contains(sample.x, sample.y);
        let Some(stroke) = self.strokes.last_mut() else {
            return;
        };
        let Some(prev) = stroke.last().copied() else {
            return;
        };

        let d = analyzer.accumulate(&mut self.stats, &sample);
        self.stats
            .turns
            .extend(self.detector.observe(&prev, &sample, d));
        stroke.samples.push(sample);

        if reached_finish {
            self.can_draw = false;
            self.pointer_down = false;
            let score = self.freeze(false);
            info!(
                "✅ Finish target reached; SARA {:.2} ({})",
                score.sara_score, score.band
            );
            self.emit(MotorEvent::Completed(score));
        }
        self.emit(MotorEvent::StatsUpdated);
    }

    pub fn pointer_leave(&mut self) {
        if self.pointer_down && self.can_draw && self.state == TestState::Active {
            self.stats.out_of_bounds += 1;
            self.pointer_down = false;
            self.emit(MotorEvent::StatsUpdated);
        }
    }

    pub fn pointer_up(&mut self) {
        self.pointer_down = false;
    }

    // --- Queries ---

    pub fn state(&self) -> TestState {
        self.state
    }

    pub fn params(&self) -> &MotorParams {
        &self.params
    }

    pub fn set_modes(&mut self, deviation_mode: DeviationMode, turn_mode: TurnMode) {
        self.params.deviation_mode = deviation_mode;
        self.params.turn_mode = turn_mode;
    }

    pub fn test(&self) -> Option<&ArmedTest> {
        self.test.as_ref()
    }

    pub fn statistics(&self) -> &MotorStatistics {
        &self.stats
    }

    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    pub fn outcome(&self) -> Option<&MotorOutcome> {
        self.outcome.as_ref()
    }

    pub fn start_hit(&self) -> bool {
        self.start_hit
    }

    pub fn reference_line(&self) -> ScreenResult<&ReferenceLine> {
        self.test
            .as_ref()
            .map(|t| t.analyzer.line())
            .ok_or(ScreenError::NotArmed)
    }

    pub fn off_by_count(&self, threshold: f64) -> ScreenResult<usize> {
        let test = self.test.as_ref().ok_or(ScreenError::NotArmed)?;
        Ok(test.analyzer.off_by_count(&self.strokes, threshold))
    }

    pub fn displayed_deviation(&self) -> f64 {
        deviation::displayed_deviation(
            self.stats.deviation_area,
            deviation::total_sample_count(&self.strokes),
            self.params.deviation_mode,
        )
    }

    pub fn displayed_turn(&self) -> f64 {
        self.stats
            .average_turn_distance(self.params.turn_mode.axis())
    }

    /// Scores the current aggregate without changing state.
    pub fn current_score(&self) -> MotorScore {
        MotorScoreAggregator::new(self.params.turn_mode).score(&self.stats)
    }
}
