pub mod analysis;
pub mod config;
pub mod engine;
pub mod error;
pub mod plot;
pub mod progress;
pub mod table;

pub use config::AppConfig;
pub use engine::{DilutionEngine, RunResult};
pub use error::Error;
pub use progress::{ProgressReporter, SilentReporter};
