use ataxia_screen::config::{MotorParams, SpeechParams};
use ataxia_screen::decode::DecodedAudio;
use ataxia_screen::error::ScreenError;
use ataxia_screen::export::{MotorExport, Patient, SessionAccumulator, CSV_HEADER};
use ataxia_screen::geometry::{MotorTestKind, Sample};
use ataxia_screen::motor::MotorSession;
use ataxia_screen::speech::{ParticipantMeta, SpeechSession};
use chrono::{TimeZone, Utc};
use serde_json::Value;
use std::f32::consts::PI;

fn meta() -> ParticipantMeta {
    ParticipantMeta {
        participant: "P07".to_string(),
        session: "S2".to_string(),
        mic_distance_cm: 30.0,
        recorded_at: Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap(),
        device_caps: "echoCancellation=false".to_string(),
    }
}

fn recorded_session() -> SpeechSession {
    let mut session = SpeechSession::with_default_tasks(SpeechParams::default()).unwrap();
    session.begin().unwrap();

    let tone: Vec<f32> = (0..8000)
        .map(|i| (2.0 * PI * 180.0 * i as f32 / 16_000.0).sin() * 0.4)
        .collect();
    session.start_recording().unwrap();
    session
        .complete_recording(&DecodedAudio::new(tone, 16_000), meta())
        .unwrap();
    session.start_recording().unwrap();
    session
        .complete_recording(&DecodedAudio::new(vec![0.0; 8000], 16_000), meta())
        .unwrap();
    session
}

fn csv_bytes(acc: &SessionAccumulator) -> String {
    let mut buf = Vec::new();
    acc.write_csv(&mut buf).unwrap();
    String::from_utf8(buf).unwrap()
}

#[test]
fn test_csv_header_and_rows() {
    let session = recorded_session();
    let text = csv_bytes(session.results());
    let mut lines = text.lines();
    assert_eq!(
        lines.next().unwrap(),
        "participant,session,test,duration_s,mean_rms,rms_cv,mean_f0_hz,f0_cv,score_0_6,sample_rate,mic_cm,recorded_at,device_caps,text"
    );
    assert_eq!(lines.count(), 2);
}

#[test]
fn test_csv_cells() {
    let session = recorded_session();
    let text = csv_bytes(session.results());
    let mut rdr = csv::Reader::from_reader(text.as_bytes());
    assert_eq!(rdr.headers().unwrap().len(), CSV_HEADER.len());

    let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
    let voiced = &rows[0];
    assert_eq!(&voiced[0], "P07");
    assert_eq!(&voiced[1], "S2");
    assert_eq!(&voiced[2], "Test 1");
    assert_eq!(&voiced[3], "0.500");
    assert_eq!(voiced[5].split('.').nth(1).map(str::len), Some(6));
    assert_eq!(&voiced[9], "16000");
    assert_eq!(&voiced[11], "2024-03-01T09:30:00.000Z");
    assert_eq!(&voiced[13], "The quick brown fox jumps over the lazy dog.");

    // Undefined metrics leave empty cells.
    let silent = &rows[1];
    assert_eq!(&silent[5], "");
    assert_eq!(&silent[6], "");
    assert_eq!(&silent[7], "");
    assert_eq!(&silent[8], "6");
    // Commas in the sentence survive quoting.
    assert_eq!(
        &silent[13],
        "We were away a year ago, and we saw a wide view of the valley."
    );
}

#[test]
fn test_json_document_shape() {
    let session = recorded_session();
    let mut buf = Vec::new();
    session.results().write_json(&mut buf).unwrap();
    let doc: Value = serde_json::from_slice(&buf).unwrap();

    let arr = doc.as_array().unwrap();
    assert_eq!(arr.len(), 2);
    assert_eq!(arr[0]["test"], "Test 1");
    assert_eq!(arr[0]["duration"], 0.5);
    assert_eq!(arr[0]["features"]["participant"], "P07");
    assert_eq!(arr[0]["features"]["micDistanceCM"], 30.0);
    assert!(arr[0]["features"]["meanF0"].is_number());
    assert!(arr[1]["features"]["meanF0"].is_null());
}

#[test]
fn test_json_feature_keys_are_flat() {
    let session = recorded_session();
    let mut buf = Vec::new();
    session.results().write_json(&mut buf).unwrap();
    let doc: Value = serde_json::from_slice(&buf).unwrap();

    let voiced = doc[0]["features"].as_object().unwrap();
    let mut keys: Vec<&str> = voiced.keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(
        keys,
        [
            "deviceCaps",
            "f0CV",
            "meanF0",
            "meanRMS",
            "micDistanceCM",
            "participant",
            "recordedAt",
            "rmsCV",
            "sampleRate",
            "score06",
            "session",
        ]
    );
    assert_eq!(voiced["sampleRate"], 16_000);
    assert!(voiced["rmsCV"].is_number());
    assert!(voiced["score06"].is_u64());

    // Silence has no defined CVs and takes the worst score.
    let silent = &doc[1]["features"];
    assert!(silent["rmsCV"].is_null());
    assert!(silent["f0CV"].is_null());
    assert_eq!(silent["score06"], 6);
}

#[test]
fn test_file_names() {
    let session = recorded_session();
    assert_eq!(session.results().csv_file_name(), "P07_speech_reading.csv");
    assert_eq!(session.results().json_file_name(), "P07_speech_reading.json");

    let empty = SessionAccumulator::new();
    assert_eq!(empty.csv_file_name(), "session_speech_reading.csv");
}

#[test]
fn test_clear() {
    let mut session = recorded_session();
    session.results_mut().clear();
    assert!(session.results().is_empty());
    assert_eq!(csv_bytes(session.results()).lines().count(), 1);
}

#[test]
fn test_motor_export_document() {
    let mut session = MotorSession::new(MotorParams::default());
    session.start(MotorTestKind::Horizontal);
    session.pointer_down(Sample::new(35.0, 300.0, 0));
    session.pointer_move(Sample::new(300.0, 320.0, 16));
    session.pointer_move(Sample::new(850.0, 300.0, 32));

    let patient = Patient::new("Jane Roe", "A12");
    let export = MotorExport::from_session(&session, &patient).unwrap();
    assert!(export.file_name().starts_with("ataxia_data_A12_"));
    assert!(export.file_name().ends_with(".json"));

    let mut buf = Vec::new();
    export.write_json(&mut buf).unwrap();
    let doc: Value = serde_json::from_slice(&buf).unwrap();
    assert_eq!(doc["patient"]["name"], "Jane Roe");
    assert_eq!(doc["test"], "Horizontal Test");
    let stats = &doc["stats"];
    assert_eq!(stats["deviationArea"], 20.0);
    assert_eq!(stats["offByThreshold"], 10.0);
    assert_eq!(stats["offByCount"], 1);
    assert_eq!(stats["deviationMode"], "total");
    assert_eq!(stats["turnMode"], "avgVertical");
    assert_eq!(stats["verticalTurns"], 1);
    assert_eq!(stats["horizontalTurns"], 0);
    assert_eq!(stats["clinical"]["score_dev"], 0.04);
    assert!(stats["clinical"]["description"]
        .as_str()
        .unwrap()
        .starts_with("Normal"));

    // The document reads back into the same type.
    let back: MotorExport = serde_json::from_slice(&buf).unwrap();
    assert_eq!(back, export);
}

#[test]
fn test_motor_export_requires_armed_test() {
    let session = MotorSession::new(MotorParams::default());
    let err = MotorExport::from_session(&session, &Patient::new("x", "1")).unwrap_err();
    assert!(matches!(err, ScreenError::NotArmed));
}
