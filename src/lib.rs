pub mod config;
pub mod decode;
pub mod error;
pub mod export;
pub mod geometry;
pub mod motor;
pub mod speech;
pub mod state;
// cmd and reports are binary modules, wired up in main.rs.

pub use config::Config;
pub use error::{ScreenError, ScreenResult};
pub use state::{CancellationToken, TestState};
