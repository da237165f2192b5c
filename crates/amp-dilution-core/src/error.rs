use crate::analysis::dilution::DilutionError;
use crate::plot::PlotError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Table error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Missing required column '{0}'")]
    MissingColumn(String),

    #[error("Malformed record at row {row}, column '{column}': {reason}")]
    MalformedRecord {
        row: usize,
        column: String,
        reason: String,
    },

    #[error("Degenerate system {kic} at row {row}: {source}")]
    Degenerate {
        row: usize,
        kic: String,
        #[source]
        source: DilutionError,
    },

    #[error("Plot error: {0}")]
    Plot(#[from] PlotError),

    #[error("{0}")]
    Other(String),
}
