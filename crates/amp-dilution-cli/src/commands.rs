use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "amp-dilution")]
#[command(about = "Amplitude dilution of Gaia visual pairs", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Compute dilution for every system, write the columns back and draw the histogram
    Process(ProcessArgs),
    /// Compute and print per-system dilution without writing anything
    Inspect(InspectArgs),
    /// Print configuration values
    PrintConfig,
}

#[derive(Debug, Args)]
pub struct ProcessArgs {
    /// Table to read and overwrite (overrides table_path)
    #[arg(long)]
    pub table: Option<String>,
    /// Histogram output (overrides histogram_path)
    #[arg(long)]
    pub histogram: Option<String>,
    /// Skip the histogram
    #[arg(long)]
    pub no_plot: bool,
}

#[derive(Debug, Args)]
pub struct InspectArgs {
    /// Table to read (overrides table_path)
    #[arg(long)]
    pub table: Option<String>,
    /// Only show this system
    #[arg(long)]
    pub kic: Option<String>,
}
