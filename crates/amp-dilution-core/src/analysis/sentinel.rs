/// Flux and flux-error lists with the unmeasured stars taken out.
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredFluxes {
    pub fluxes: Vec<f64>,
    pub errors: Vec<f64>,
    /// Original positions of the stars that were dropped, ascending.
    pub removed: Vec<usize>,
    /// Subset of `removed` whose flux itself was the sentinel. A star dropped
    /// only for its error does not appear here.
    pub missing_flux: Vec<usize>,
}

impl FilteredFluxes {
    pub fn primary_removed(&self) -> bool {
        self.removed.first() == Some(&0)
    }
}

/// Drop every star whose flux or flux error equals `sentinel`.
///
/// Removal is by position, so the two lists stay index-aligned. Callers must
/// pass lists of equal length.
pub fn strip_sentinels(fluxes: &[f64], errors: &[f64], sentinel: f64) -> FilteredFluxes {
    debug_assert_eq!(fluxes.len(), errors.len());

    let mut filtered = FilteredFluxes {
        fluxes: Vec::with_capacity(fluxes.len()),
        errors: Vec::with_capacity(errors.len()),
        removed: Vec::new(),
        missing_flux: Vec::new(),
    };

    for (i, (&flux, &error)) in fluxes.iter().zip(errors).enumerate() {
        if flux == sentinel {
            filtered.missing_flux.push(i);
        }
        if flux == sentinel || error == sentinel {
            filtered.removed.push(i);
        } else {
            filtered.fluxes.push(flux);
            filtered.errors.push(error);
        }
    }

    filtered
}

#[cfg(test)]
mod tests {
    use super::*;

    const SENTINEL: f64 = -999.0;

    #[test]
    fn test_no_sentinel() {
        let f = strip_sentinels(&[1.0, 2.0], &[0.1, 0.2], SENTINEL);
        assert_eq!(f.fluxes, vec![1.0, 2.0]);
        assert_eq!(f.errors, vec![0.1, 0.2]);
        assert!(f.removed.is_empty());
        assert!(f.missing_flux.is_empty());
    }

    #[test]
    fn test_removes_aligned_error() {
        // error list holds its own sentinel at a different position than the flux one
        let f = strip_sentinels(
            &[1000.0, -999.0, 500.0, 300.0],
            &[10.0, 7.0, -999.0, 3.0],
            SENTINEL,
        );
        assert_eq!(f.fluxes, vec![1000.0, 300.0]);
        assert_eq!(f.errors, vec![10.0, 3.0]);
        assert_eq!(f.removed, vec![1, 2]);
        assert_eq!(f.missing_flux, vec![1]);
    }

    #[test]
    fn test_removes_every_occurrence() {
        let f = strip_sentinels(
            &[1000.0, -999.0, 200.0, -999.0],
            &[10.0, -999.0, 2.0, -999.0],
            SENTINEL,
        );
        assert_eq!(f.fluxes, vec![1000.0, 200.0]);
        assert_eq!(f.errors, vec![10.0, 2.0]);
        assert_eq!(f.removed, vec![1, 3]);
        assert!(!f.primary_removed());
    }

    #[test]
    fn test_primary_removed() {
        let f = strip_sentinels(&[-999.0, 100.0], &[-999.0, 1.0], SENTINEL);
        assert!(f.primary_removed());
        assert_eq!(f.fluxes, vec![100.0]);
    }

    #[test]
    fn test_error_only_sentinel_is_dropped_but_not_missing_flux() {
        let f = strip_sentinels(&[1000.0, 400.0], &[10.0, -999.0], SENTINEL);
        assert_eq!(f.fluxes, vec![1000.0]);
        assert_eq!(f.removed, vec![1]);
        assert!(f.missing_flux.is_empty());
    }
}
