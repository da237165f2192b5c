use amp_dilution_core::ProgressReporter;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;

const TICK_CHARS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

/// CLI progress reporter using indicatif progress bars.
///
/// - Load, write and plot phases: spinner
/// - Compute phase: progress bar over the systems
pub struct CliReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl CliReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn set_bar(&self, pb: ProgressBar) {
        if let Ok(mut guard) = self.bar.lock() {
            if let Some(old) = guard.replace(pb) {
                old.finish_and_clear();
            }
        }
    }

    fn finish_bar(&self) {
        if let Ok(mut guard) = self.bar.lock() {
            if let Some(pb) = guard.take() {
                pb.finish_and_clear();
            }
        }
    }

    fn spinner(&self, message: String) {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_chars(TICK_CHARS),
        );
        pb.set_message(message);
        pb.enable_steady_tick(Duration::from_millis(80));
        self.set_bar(pb);
    }

    fn done(&self, message: String) {
        self.finish_bar();
        eprintln!("  \x1b[32m✓\x1b[0m {}", message);
    }
}

impl Default for CliReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for CliReporter {
    fn on_load_start(&self, path: &str) {
        self.spinner(format!("Loading {}...", path));
    }

    fn on_load_complete(&self, rows: usize, duration_secs: f64) {
        self.done(format!("Loaded {} systems in {:.2}s", rows, duration_secs));
    }

    fn on_compute_start(&self, total_systems: usize) {
        let pb = ProgressBar::new(total_systems as u64);
        pb.set_style(
            ProgressStyle::with_template(
                "  {spinner:.cyan} Computing [{bar:30.cyan/dim}] {pos}/{len} systems",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("━╸─")
            .tick_chars(TICK_CHARS),
        );
        self.set_bar(pb);
    }

    fn on_compute_progress(&self, systems_done: usize, _total_systems: usize) {
        if let Ok(guard) = self.bar.lock() {
            if let Some(pb) = guard.as_ref() {
                pb.set_position(systems_done as u64);
            }
        }
    }

    fn on_compute_complete(&self, systems: usize, duration_secs: f64) {
        self.done(format!(
            "Dilution computed for {} systems in {:.2}s",
            systems, duration_secs
        ));
    }

    fn on_write_start(&self, path: &str) {
        self.spinner(format!("Writing {}...", path));
    }

    fn on_write_complete(&self, rows: usize, duration_secs: f64) {
        self.done(format!(
            "Table written: {} rows in {:.2}s",
            rows, duration_secs
        ));
    }

    fn on_plot_start(&self, path: &str) {
        self.spinner(format!("Drawing histogram {}...", path));
    }

    fn on_plot_complete(&self, duration_secs: f64) {
        self.done(format!("Histogram saved in {:.2}s", duration_secs));
    }
}
