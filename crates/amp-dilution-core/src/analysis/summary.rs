use super::dilution::DilutionError;
use super::statistics::median;
use crate::table::models::{OutcomeStatus, SystemOutcome};

/// Run-level figures reported after every system has been processed.
#[derive(Debug, Clone, PartialEq)]
pub struct DilutionSummary {
    pub systems: usize,
    /// Systems with at least one unmeasured star, in table order.
    pub missing_flux_kics: Vec<String>,
    /// Systems skipped because their dilution could not be computed.
    pub degenerate: Vec<(String, DilutionError)>,
    /// Median dilution in percent over the non-degenerate systems.
    pub median_percent: Option<f64>,
    pub threshold_percent: f64,
    /// Systems with dilution >= `threshold_percent`, in table order.
    pub high_dilution_kics: Vec<String>,
}

impl DilutionSummary {
    pub fn missing_flux_count(&self) -> usize {
        self.missing_flux_kics.len()
    }
}

/// Dilution percentages of the systems that have one, in table order.
pub fn dilution_values(outcomes: &[SystemOutcome]) -> Vec<f64> {
    outcomes.iter().filter_map(|o| o.dilution_percent()).collect()
}

/// Each identifier is taken from the outcome it belongs to, so systems that
/// share a dilution value keep their own identifiers.
pub fn summarize(outcomes: &[SystemOutcome], threshold_percent: f64) -> DilutionSummary {
    let missing_flux_kics = outcomes
        .iter()
        .filter(|o| o.has_missing_flux())
        .map(|o| o.kic.clone())
        .collect();

    let degenerate = outcomes
        .iter()
        .filter_map(|o| match o.status {
            OutcomeStatus::Degenerate(e) => Some((o.kic.clone(), e)),
            _ => None,
        })
        .collect();

    let high_dilution_kics = outcomes
        .iter()
        .filter(|o| o.dilution_percent().is_some_and(|d| d >= threshold_percent))
        .map(|o| o.kic.clone())
        .collect();

    DilutionSummary {
        systems: outcomes.len(),
        missing_flux_kics,
        degenerate,
        median_percent: median(&dilution_values(outcomes)),
        threshold_percent,
        high_dilution_kics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::dilution::DilutionResult;

    fn outcome(row: usize, kic: &str, dilution: Option<f64>) -> SystemOutcome {
        SystemOutcome {
            row,
            kic: kic.to_string(),
            result: dilution.map(|d| DilutionResult {
                dilution_percent: d,
                dilution_error_percent: 1.0,
            }),
            removed_positions: Vec::new(),
            missing_flux_positions: Vec::new(),
            status: match dilution {
                Some(_) => OutcomeStatus::Computed,
                None => OutcomeStatus::Degenerate(DilutionError::ZeroTotalFlux),
            },
        }
    }

    #[test]
    fn test_duplicate_values_keep_their_identifiers() {
        let outcomes = vec![
            outcome(0, "111", Some(25.0)),
            outcome(1, "222", Some(5.0)),
            outcome(2, "333", Some(25.0)),
        ];
        let summary = summarize(&outcomes, 10.0);
        assert_eq!(summary.high_dilution_kics, vec!["111", "333"]);
        assert_eq!(summary.median_percent, Some(25.0));
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let outcomes = vec![outcome(0, "a", Some(10.0)), outcome(1, "b", Some(9.999))];
        let summary = summarize(&outcomes, 10.0);
        assert_eq!(summary.high_dilution_kics, vec!["a"]);
    }

    #[test]
    fn test_degenerate_excluded_from_statistics() {
        let outcomes = vec![
            outcome(0, "a", Some(0.0)),
            outcome(1, "b", None),
            outcome(2, "c", Some(50.0)),
        ];
        let summary = summarize(&outcomes, 10.0);
        assert_eq!(summary.systems, 3);
        assert_eq!(summary.median_percent, Some(25.0));
        assert_eq!(
            summary.degenerate,
            vec![("b".to_string(), DilutionError::ZeroTotalFlux)]
        );
        assert_eq!(summary.high_dilution_kics, vec!["c"]);
    }

    #[test]
    fn test_missing_flux_tally() {
        let mut flagged = outcome(1, "b", Some(20.0));
        flagged.removed_positions = vec![2];
        flagged.missing_flux_positions = vec![2];
        let mut error_only = outcome(2, "c", Some(30.0));
        error_only.removed_positions = vec![1];
        let outcomes = vec![outcome(0, "a", Some(0.0)), flagged, error_only];
        let summary = summarize(&outcomes, 10.0);
        assert_eq!(summary.missing_flux_count(), 1);
        assert_eq!(summary.missing_flux_kics, vec!["b"]);
    }

    #[test]
    fn test_empty() {
        let summary = summarize(&[], 10.0);
        assert_eq!(summary.systems, 0);
        assert_eq!(summary.median_percent, None);
    }
}
