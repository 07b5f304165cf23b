use crate::reports;
use ataxia_screen::config::Config;
use ataxia_screen::decode::{DecodedAudio, WavDecoder};
use ataxia_screen::error::ScreenResult;
use ataxia_screen::speech::{ParticipantMeta, SpeechSession};
use ataxia_screen::state::TestState;
use chrono::Utc;
use clap::Args;
use rayon::prelude::*;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use tracing::{error, info, warn};

#[derive(Args, Debug, Clone)]
pub struct SpeechArgs {
    #[command(flatten)]
    pub config: Config,

    /// WAV recordings in task order, one per repetition.
    #[arg(required = true)]
    pub recordings: Vec<PathBuf>,

    #[arg(long, default_value = "NA")]
    pub participant: String,

    #[arg(long, default_value = "S1")]
    pub session: String,

    #[arg(long, default_value_t = 0.0)]
    pub mic_cm: f64,

    #[arg(long, default_value = "")]
    pub device_caps: String,

    /// Directory for the CSV and JSON exports.
    #[arg(short, long)]
    pub out_dir: Option<PathBuf>,
}

impl SpeechArgs {
    fn meta(&self) -> ParticipantMeta {
        ParticipantMeta {
            participant: self.participant.clone(),
            session: self.session.clone(),
            mic_distance_cm: self.mic_cm,
            recorded_at: Utc::now(),
            device_caps: self.device_caps.clone(),
        }
    }
}

pub fn run(args: SpeechArgs, config: Config) -> ScreenResult<()> {
    info!("🎧 Decoding {} recordings...", args.recordings.len());
    let decoder = WavDecoder;
    let decoded: Vec<DecodedAudio> = args
        .recordings
        .par_iter()
        .map(|path| {
            decoder.open(path).unwrap_or_else(|e| {
                // A failed decode still counts as a trial, scored on no audio.
                error!("❌ {}: {}", path.display(), e);
                DecodedAudio::new(Vec::new(), 0)
            })
        })
        .collect();

    let mut session = SpeechSession::with_default_tasks(config.speech)?;
    session.begin()?;

    for (path, audio) in args.recordings.iter().zip(&decoded) {
        if session.state() == TestState::Completed {
            warn!(
                "⚠️  All tasks done; ignoring {} and later recordings",
                path.display()
            );
            break;
        }
        if let Some(task) = session.current_task() {
            info!(
                "🗣️  {} rep {}: {}",
                task.title,
                session.current_rep(),
                task.prompt()
            );
        }
        session.start_recording()?;
        session.complete_recording(audio, args.meta())?;
    }

    if session.state() != TestState::Completed {
        warn!("⚠️  Fewer recordings than tasks; stopping early");
        session.stop(None, args.meta());
    }

    let results = session.results();
    reports::print_speech_report(results);

    if let Some(dir) = &args.out_dir {
        let csv_path = dir.join(results.csv_file_name());
        results.write_csv(BufWriter::new(File::create(&csv_path)?))?;
        info!("💾 Saved {}", csv_path.display());

        let json_path = dir.join(results.json_file_name());
        results.write_json(BufWriter::new(File::create(&json_path)?))?;
        info!("💾 Saved {}", json_path.display());
    }
    Ok(())
}
