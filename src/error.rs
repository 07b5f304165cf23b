use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScreenError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV Parsing Error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("WAV Decoding Error: {0}")]
    Wav(#[from] hound::Error),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Data Validation Error: {0}")]
    Validation(String),

    #[error("No test is armed: reference points are undefined")]
    NotArmed,

    #[error("Cannot {action} while {from}")]
    InvalidState { from: String, action: &'static str },

    #[error("A recording is already active")]
    RecordingInProgress,
}

pub type ScreenResult<T> = Result<T, ScreenError>;
