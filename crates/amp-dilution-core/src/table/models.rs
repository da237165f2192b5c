use crate::analysis::dilution::{DilutionError, DilutionResult};

/// One system (row) of the survey table, with its lists already decoded.
#[derive(Debug, Clone, PartialEq)]
pub struct SystemRecord {
    /// 0-based data row position in the table (header excluded).
    pub row: usize,
    pub kic: String,
    /// Primary first, then visual pairs.
    pub fluxes: Vec<f64>,
    /// Index-aligned with `fluxes`.
    pub flux_errors: Vec<f64>,
}

/// How a system's dilution was obtained.
#[derive(Debug, Clone, PartialEq)]
pub enum OutcomeStatus {
    Computed,
    /// Only the primary remained; dilution is defined as 0.
    SingleStar,
    Degenerate(DilutionError),
}

/// Result of processing one system, tied to its row position.
#[derive(Debug, Clone, PartialEq)]
pub struct SystemOutcome {
    pub row: usize,
    pub kic: String,
    /// `None` for degenerate systems.
    pub result: Option<DilutionResult>,
    /// Star positions dropped because their flux or flux error was the sentinel.
    pub removed_positions: Vec<usize>,
    /// Positions among `removed_positions` whose flux was the sentinel.
    pub missing_flux_positions: Vec<usize>,
    pub status: OutcomeStatus,
}

impl SystemOutcome {
    /// At least one star has no measured flux. A star dropped only because
    /// its flux error is the sentinel does not count.
    pub fn has_missing_flux(&self) -> bool {
        !self.missing_flux_positions.is_empty()
    }

    pub fn is_degenerate(&self) -> bool {
        matches!(self.status, OutcomeStatus::Degenerate(_))
    }

    pub fn dilution_percent(&self) -> Option<f64> {
        self.result.map(|r| r.dilution_percent)
    }
}
