use super::dilution::{compute_dilution, DilutionError, DilutionResult};
use super::sentinel::strip_sentinels;
use crate::table::models::{OutcomeStatus, SystemOutcome, SystemRecord};
use tracing::trace;

/// Compute the dilution of one system.
///
/// A system listing exactly one star is undiluted whatever its values are,
/// the sentinel included, and is never filtered. Otherwise unmeasured stars
/// are dropped first. A system whose primary is unmeasured, or whose flux
/// sums to zero, comes back as [`OutcomeStatus::Degenerate`] with no result;
/// the caller decides what that means for the run.
pub fn process_record(record: &SystemRecord, sentinel: f64) -> SystemOutcome {
    if record.fluxes.len() == 1 {
        trace!("row {} kic {}: single star", record.row, record.kic);
        return SystemOutcome {
            row: record.row,
            kic: record.kic.clone(),
            result: Some(DilutionResult::ZERO),
            removed_positions: Vec::new(),
            missing_flux_positions: Vec::new(),
            status: OutcomeStatus::SingleStar,
        };
    }

    let filtered = strip_sentinels(&record.fluxes, &record.flux_errors, sentinel);

    let computed: Result<DilutionResult, DilutionError> = if filtered.primary_removed() {
        Err(DilutionError::MissingPrimary)
    } else {
        compute_dilution(&filtered.fluxes, &filtered.errors)
    };

    let (result, status) = match computed {
        Ok(result) if filtered.fluxes.len() == 1 => (Some(result), OutcomeStatus::SingleStar),
        Ok(result) => (Some(result), OutcomeStatus::Computed),
        Err(e) => (None, OutcomeStatus::Degenerate(e)),
    };

    trace!(
        "row {} kic {}: {:?} ({:?})",
        record.row,
        record.kic,
        result,
        status
    );

    SystemOutcome {
        row: record.row,
        kic: record.kic.clone(),
        result,
        removed_positions: filtered.removed,
        missing_flux_positions: filtered.missing_flux,
        status,
    }
}
