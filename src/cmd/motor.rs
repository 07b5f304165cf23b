use crate::reports;
use ataxia_screen::config::Config;
use ataxia_screen::error::ScreenResult;
use ataxia_screen::export::{MotorExport, Patient};
use ataxia_screen::geometry::{MotorTestKind, Sample};
use ataxia_screen::motor::{MotorEvent, MotorObserver, MotorSession, PointerEvent};
use ataxia_screen::state::TestState;
use clap::Args;
use serde::Deserialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

#[derive(Args, Debug, Clone)]
pub struct MotorArgs {
    #[command(flatten)]
    pub config: Config,

    /// CSV with columns event,x,y,t (event: down|move|up|leave).
    #[arg(short, long)]
    pub trace: PathBuf,

    #[arg(long, default_value = "horizontal")]
    pub test: MotorTestKind,

    #[arg(long, default_value = "Anonymous")]
    pub patient_name: String,

    #[arg(long, default_value = "0")]
    pub patient_id: String,

    /// Directory for the JSON result document.
    #[arg(short, long)]
    pub out_dir: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum TraceKind {
    Down,
    Move,
    Up,
    Leave,
}

#[derive(Debug, Deserialize)]
struct TraceRow {
    event: TraceKind,
    x: Option<f64>,
    y: Option<f64>,
    t: Option<u64>,
}

impl TraceRow {
    fn into_event(self) -> Option<PointerEvent> {
        let sample = match (self.x, self.y) {
            (Some(x), Some(y)) => Some(Sample::new(x, y, self.t.unwrap_or(0))),
            _ => None,
        };
        match self.event {
            TraceKind::Down => sample.map(PointerEvent::Down),
            TraceKind::Move => sample.map(PointerEvent::Move),
            TraceKind::Up => Some(PointerEvent::Up),
            TraceKind::Leave => Some(PointerEvent::Leave),
        }
    }
}

struct CliObserver;
impl MotorObserver for CliObserver {
    fn on_event(&mut self, event: &MotorEvent) {
        match event {
            MotorEvent::StartHit => info!("▶️  Start target hit"),
            MotorEvent::StatsUpdated => {}
            other => debug!("{:?}", other),
        }
    }
}

fn read_trace(path: &Path) -> ScreenResult<Vec<PointerEvent>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)?;
    let mut events = Vec::new();
    for (i, row) in rdr.deserialize::<TraceRow>().enumerate() {
        match row {
            Ok(r) => match r.into_event() {
                Some(e) => events.push(e),
                None => warn!("⚠️  Trace row {} has no coordinates; skipped", i + 1),
            },
            Err(e) => warn!("⚠️  Trace row {} is malformed ({}); skipped", i + 1, e),
        }
    }
    Ok(events)
}

pub fn run(args: MotorArgs, config: Config) -> ScreenResult<()> {
    info!("📂 Loading trace: {}", args.trace.display());
    let events = read_trace(&args.trace)?;
    info!("   {} pointer events", events.len());

    let mut session = MotorSession::new(config.motor);
    session.subscribe(Box::new(CliObserver));
    session.start(args.test);

    for event in events {
        if session.state() != TestState::Active {
            break;
        }
        session.handle(event);
    }
    if session.state() == TestState::Active {
        warn!("⚠️  Trace ended before the finish target was reached");
        session.stop()?;
    }

    let patient = Patient::new(&args.patient_name, &args.patient_id);
    let export = MotorExport::from_session(&session, &patient)?;
    reports::print_motor_report(&export, session.state());

    if let Some(dir) = args.out_dir {
        let path = dir.join(export.file_name());
        export.write_json(BufWriter::new(File::create(&path)?))?;
        info!("💾 Saved {}", path.display());
    }
    Ok(())
}
