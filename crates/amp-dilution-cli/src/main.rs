mod commands;
mod logging;
mod progress;

use std::process;

use amp_dilution_core::analysis::DilutionSummary;
use amp_dilution_core::table::models::{OutcomeStatus, SystemOutcome};
use amp_dilution_core::table::SystemTable;
use amp_dilution_core::{AppConfig, DilutionEngine, SilentReporter};
use anyhow::{bail, Context};
use clap::{CommandFactory, Parser};
use colored::*;
use commands::{Cli, Commands, InspectArgs, ProcessArgs};
use dotenv::dotenv;
use progress::CliReporter;
use tracing::{error, info, warn};

fn main() {
    dotenv().ok();

    let guard = logging::init_logger();

    let config = match amp_dilution_core::config::load_configuration() {
        Ok(config) => config,
        Err(err) => {
            error!("Error loading configuration: {}", err);
            drop(guard);
            process::exit(1);
        }
    };

    let args = Cli::parse();

    let result = match args.command {
        Some(Commands::Process(args)) => run_process(config, args),
        Some(Commands::Inspect(args)) => run_inspect(config, args),
        Some(Commands::PrintConfig) => {
            println!("Configuration: {:#?}", config);
            Ok(())
        }
        None => {
            let _ = Cli::command().print_long_help();
            Ok(())
        }
    };

    if let Err(err) = result {
        error!("Error: {:#}", err);
        drop(guard);
        process::exit(1);
    }
}

fn run_process(mut config: AppConfig, args: ProcessArgs) -> anyhow::Result<()> {
    if let Some(table) = args.table {
        config.table_path = table;
    }
    if let Some(histogram) = args.histogram {
        config.histogram_path = histogram;
    }

    let mut engine = DilutionEngine::new(config);
    if args.no_plot {
        engine = engine.without_plot();
    }

    let reporter = CliReporter::new();
    let result = engine
        .run(&reporter)
        .with_context(|| format!("processing {}", engine.config().table_path))?;

    println!();
    info!(
        "Load: {}, Compute: {}, Write: {}, Plot: {}",
        format!("{:.2}s", result.load_duration.as_secs_f64()).green(),
        format!("{:.2}s", result.compute_duration.as_secs_f64()).green(),
        format_optional_secs(result.write_duration).green(),
        format_optional_secs(result.plot_duration).green(),
    );
    print_summary(&result.summary);

    Ok(())
}

fn run_inspect(mut config: AppConfig, args: InspectArgs) -> anyhow::Result<()> {
    if let Some(table) = args.table {
        config.table_path = table;
    }

    let engine = DilutionEngine::new(config).read_only();
    let result = engine
        .run(&SilentReporter)
        .with_context(|| format!("reading {}", engine.config().table_path))?;

    let selected: Vec<&SystemOutcome> = match &args.kic {
        Some(kic) => result.outcomes.iter().filter(|o| &o.kic == kic).collect(),
        None => result.outcomes.iter().collect(),
    };
    if let Some(kic) = args.kic.as_ref().filter(|_| selected.is_empty()) {
        bail!("no system with kic {} in {}", kic, engine.config().table_path);
    }

    // A single system also gets its raw list cells, as stored in the table.
    let table = match &args.kic {
        Some(_) => {
            let config = engine.config();
            Some(SystemTable::read(&config.table_path, config.delimiter_byte()?)?)
        }
        None => None,
    };

    println!(
        "{:>6}  {:>12}  {:>10}  {:>10}  {}",
        "row", "kic", "dil [%]", "err [%]", "status"
    );
    for outcome in selected {
        println!("{}", format_outcome(outcome));
        if let Some(table) = &table {
            println!("{}", format_raw_cells(table, engine.config(), outcome.row));
        }
    }

    if args.kic.is_none() {
        println!();
        print_summary(&result.summary);
    }

    Ok(())
}

fn format_outcome(outcome: &SystemOutcome) -> String {
    let (dil, err) = match outcome.result {
        Some(r) => (
            format!("{:.2}", r.dilution_percent),
            format!("{:.2}", r.dilution_error_percent),
        ),
        None => ("-".to_string(), "-".to_string()),
    };
    let mut status = match &outcome.status {
        OutcomeStatus::Computed => "ok".to_string(),
        OutcomeStatus::SingleStar => "single star".to_string(),
        OutcomeStatus::Degenerate(e) => format!("skipped: {}", e),
    };
    if outcome.has_missing_flux() {
        status.push_str(&format!(
            " (no flux for star {:?})",
            outcome.missing_flux_positions
        ));
    }
    let error_only: Vec<usize> = outcome
        .removed_positions
        .iter()
        .copied()
        .filter(|p| !outcome.missing_flux_positions.contains(p))
        .collect();
    if !error_only.is_empty() {
        status.push_str(&format!(" (no flux error for star {:?})", error_only));
    }
    format!(
        "{:>6}  {:>12}  {:>10}  {:>10}  {}",
        outcome.row, outcome.kic, dil, err, status
    )
}

fn format_raw_cells(table: &SystemTable, config: &AppConfig, row: usize) -> String {
    [&config.flux_column, &config.flux_err_column]
        .iter()
        .map(|column| {
            format!(
                "{:>8}{}: {}",
                "",
                column,
                table.cell(row, column).unwrap_or("-")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn print_summary(summary: &DilutionSummary) {
    info!(
        "Of the {} systems, {} systems have at least one star with no flux value.",
        format!("{}", summary.systems).cyan(),
        format!("{}", summary.missing_flux_count()).yellow(),
    );
    if !summary.missing_flux_kics.is_empty() {
        info!(
            "These systems have the following KIC IDs: {}",
            summary.missing_flux_kics.join(", ")
        );
    }

    match summary.median_percent {
        Some(median) => info!(
            "Median amplitude dilution: {}",
            format!("{:.2}%", median).green()
        ),
        None => warn!("No systems with a computable amplitude dilution"),
    }

    info!(
        "{} systems have amplitude dilution >= {}%: {}",
        format!("{}", summary.high_dilution_kics.len()).red(),
        summary.threshold_percent,
        summary.high_dilution_kics.join(", ")
    );

    for (kic, reason) in &summary.degenerate {
        warn!("Skipped kic {}: {}", kic, reason);
    }
}

fn format_optional_secs(duration: Option<std::time::Duration>) -> String {
    match duration {
        Some(d) => format!("{:.2}s", d.as_secs_f64()),
        None => "skipped".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use amp_dilution_core::analysis::DilutionResult;

    fn outcome(removed: Vec<usize>, missing_flux: Vec<usize>) -> SystemOutcome {
        SystemOutcome {
            row: 0,
            kic: "757076".to_string(),
            result: Some(DilutionResult::ZERO),
            removed_positions: removed,
            missing_flux_positions: missing_flux,
            status: OutcomeStatus::Computed,
        }
    }

    #[test]
    fn test_format_outcome_separates_flux_and_error_gaps() {
        let line = format_outcome(&outcome(vec![1, 2], vec![1]));
        assert!(line.contains("(no flux for star [1])"));
        assert!(line.contains("(no flux error for star [2])"));

        let line = format_outcome(&outcome(vec![2], Vec::new()));
        assert!(!line.contains("no flux for"));
        assert!(line.contains("(no flux error for star [2])"));
    }

    #[test]
    fn test_format_raw_cells_shows_stored_lists() {
        let data = "kic,g_flux,g_flux_err\n757076,\"[1000, -999]\",\"[10, -999]\"\n";
        let table = SystemTable::from_reader(data.as_bytes(), b',').unwrap();
        let config = AppConfig::default();
        let text = format_raw_cells(&table, &config, 0);
        assert!(text.contains("g_flux: [1000, -999]"));
        assert!(text.contains("g_flux_err: [10, -999]"));
        assert!(format_raw_cells(&table, &config, 5).contains("g_flux: -"));
    }
}
