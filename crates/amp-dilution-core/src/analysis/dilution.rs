use thiserror::Error;

/// Conditions under which a system's dilution cannot be computed.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DilutionError {
    #[error("no flux values")]
    Empty,

    #[error("primary star has no flux value")]
    MissingPrimary,

    #[error("total system flux is zero")]
    ZeroTotalFlux,

    #[error("companion flux is zero")]
    ZeroCompanionFlux,
}

/// Flux sums for one system.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FluxSums {
    pub total: f64,
    pub companions: f64,
    /// companions / total, 0 for a single star.
    pub ratio: f64,
    pub star_count: usize,
}

/// Derived per-system values, both in percent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DilutionResult {
    pub dilution_percent: f64,
    pub dilution_error_percent: f64,
}

impl DilutionResult {
    pub const ZERO: DilutionResult = DilutionResult {
        dilution_percent: 0.0,
        dilution_error_percent: 0.0,
    };
}

/// Amplitude dilution = flux of the visual pairs / total flux of the system.
///
/// `fluxes[0]` is the primary target. A single star has a ratio of 0 and no
/// division is performed.
pub fn amplitude_dilution(fluxes: &[f64]) -> Result<FluxSums, DilutionError> {
    let (primary, companions) = fluxes.split_first().ok_or(DilutionError::Empty)?;

    let companion_flux: f64 = companions.iter().sum();
    let total = primary + companion_flux;

    if companions.is_empty() {
        return Ok(FluxSums {
            total,
            companions: 0.0,
            ratio: 0.0,
            star_count: 1,
        });
    }

    if total == 0.0 {
        return Err(DilutionError::ZeroTotalFlux);
    }

    Ok(FluxSums {
        total,
        companions: companion_flux,
        ratio: companion_flux / total,
        star_count: fluxes.len(),
    })
}

/// Propagated error of the amplitude dilution, in percent.
///
/// Flux errors are combined in quadrature for the whole system and for the
/// companions alone:
///
/// `ratio * sqrt((σ_comp / F_comp)² + (σ_total / F_total)²) * 100`
pub fn amplitude_dilution_error(errors: &[f64], sums: &FluxSums) -> Result<f64, DilutionError> {
    if errors.is_empty() {
        return Err(DilutionError::Empty);
    }
    if sums.star_count <= 1 {
        return Ok(0.0);
    }
    if sums.total == 0.0 {
        return Err(DilutionError::ZeroTotalFlux);
    }
    if sums.companions == 0.0 {
        return Err(DilutionError::ZeroCompanionFlux);
    }

    let total_error = quadrature(errors);
    let companion_error = quadrature(&errors[1..]);

    let relative = ((companion_error / sums.companions).powi(2)
        + (total_error / sums.total).powi(2))
    .sqrt();

    Ok(sums.ratio * relative * 100.0)
}

/// Dilution and its error for already filtered, index-aligned lists.
pub fn compute_dilution(fluxes: &[f64], errors: &[f64]) -> Result<DilutionResult, DilutionError> {
    let sums = amplitude_dilution(fluxes)?;
    let dilution_error_percent = amplitude_dilution_error(errors, &sums)?;
    Ok(DilutionResult {
        dilution_percent: sums.ratio * 100.0,
        dilution_error_percent,
    })
}

fn quadrature(values: &[f64]) -> f64 {
    values.iter().map(|v| v * v).sum::<f64>().sqrt()
}
