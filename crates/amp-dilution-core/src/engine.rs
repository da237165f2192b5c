use crate::analysis::summary::{dilution_values, summarize, DilutionSummary};
use crate::analysis::system::process_record;
use crate::config::{AppConfig, DegeneratePolicy};
use crate::error::Error;
use crate::plot;
use crate::progress::ProgressReporter;
use crate::table::flux_list::format_flux_list;
use crate::table::models::{OutcomeStatus, SystemOutcome, SystemRecord};
use crate::table::{Columns, SystemTable};
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

pub struct DilutionEngine {
    config: AppConfig,
    write_table: bool,
    render_plot: bool,
}

#[derive(Debug)]
pub struct RunResult {
    pub load_duration: Duration,
    pub compute_duration: Duration,
    pub write_duration: Option<Duration>,
    pub plot_duration: Option<Duration>,
    /// One entry per table row, in table order.
    pub outcomes: Vec<SystemOutcome>,
    pub summary: DilutionSummary,
}

impl DilutionEngine {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            write_table: true,
            render_plot: true,
        }
    }

    pub fn without_plot(mut self) -> Self {
        self.render_plot = false;
        self
    }

    /// Compute and summarise only; nothing is written to disk.
    pub fn read_only(mut self) -> Self {
        self.write_table = false;
        self.render_plot = false;
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Run the amplitude dilution pipeline:
    /// 1. Load the table and decode the flux lists
    /// 2. Compute dilution and its error per system
    /// 3. Write the two derived columns back over the table
    /// 4. Render the histogram
    pub fn run(&self, reporter: &dyn ProgressReporter) -> Result<RunResult, Error> {
        let config = &self.config;
        let delimiter = config.delimiter_byte()?;

        // Phase 1: Load
        info!("Loading {}", config.table_path);
        reporter.on_load_start(&config.table_path);
        let load_start = Instant::now();
        let table = SystemTable::read(&config.table_path, delimiter)?;
        let records = table.records(Columns {
            id: &config.id_column,
            flux: &config.flux_column,
            flux_err: &config.flux_err_column,
        })?;
        let load_duration = load_start.elapsed();
        reporter.on_load_complete(records.len(), load_duration.as_secs_f64());
        debug!(
            "Loaded {} systems in {:.2}s",
            records.len(),
            load_duration.as_secs_f64()
        );

        // Phase 2: Compute
        reporter.on_compute_start(records.len());
        let compute_start = Instant::now();
        let outcomes = compute_outcomes(&records, config, reporter)?;
        let summary = summarize(&outcomes, config.threshold_percent);
        let compute_duration = compute_start.elapsed();
        reporter.on_compute_complete(outcomes.len(), compute_duration.as_secs_f64());
        debug!(
            "Computed {} systems in {:.2}s",
            outcomes.len(),
            compute_duration.as_secs_f64()
        );

        // Phase 3: Write
        let write_duration = if self.write_table {
            info!("Writing derived columns to {}", config.table_path);
            reporter.on_write_start(&config.table_path);
            let write_start = Instant::now();
            let results: Vec<_> = outcomes.iter().map(|o| o.result).collect();
            table
                .augment(&config.dilution_column, &config.dilution_err_column, &results)?
                .write(&config.table_path)?;
            let elapsed = write_start.elapsed();
            reporter.on_write_complete(outcomes.len(), elapsed.as_secs_f64());
            Some(elapsed)
        } else {
            None
        };

        // Phase 4: Plot
        let values = dilution_values(&outcomes);
        let plot_duration = if !self.render_plot {
            None
        } else if values.is_empty() {
            warn!("No dilution values to plot, skipping histogram");
            None
        } else {
            info!("Rendering histogram to {}", config.histogram_path);
            reporter.on_plot_start(&config.histogram_path);
            let plot_start = Instant::now();
            plot::render_histogram(
                &values,
                &summary,
                config.histogram_bins,
                Path::new(&config.histogram_path),
            )?;
            let elapsed = plot_start.elapsed();
            reporter.on_plot_complete(elapsed.as_secs_f64());
            Some(elapsed)
        };

        Ok(RunResult {
            load_duration,
            compute_duration,
            write_duration,
            plot_duration,
            outcomes,
            summary,
        })
    }
}

/// Process every record in order, applying the configured policy to
/// degenerate systems.
pub fn compute_outcomes(
    records: &[SystemRecord],
    config: &AppConfig,
    reporter: &dyn ProgressReporter,
) -> Result<Vec<SystemOutcome>, Error> {
    let total = records.len();
    let mut outcomes = Vec::with_capacity(total);

    for (done, record) in records.iter().enumerate() {
        let outcome = process_record(record, config.sentinel);

        if outcome.has_missing_flux() {
            debug!(
                "kic {} has no flux for star(s) {:?} in {}",
                outcome.kic,
                outcome.missing_flux_positions,
                format_flux_list(&record.fluxes)
            );
        }

        if let OutcomeStatus::Degenerate(source) = outcome.status {
            match config.degenerate_policy {
                DegeneratePolicy::Fail => {
                    return Err(Error::Degenerate {
                        row: outcome.row,
                        kic: outcome.kic,
                        source,
                    });
                }
                DegeneratePolicy::Skip => {
                    warn!(
                        "Skipping kic {} (row {}): {}",
                        outcome.kic, outcome.row, source
                    );
                }
            }
        }

        outcomes.push(outcome);
        reporter.on_compute_progress(done + 1, total);
    }

    Ok(outcomes)
}
