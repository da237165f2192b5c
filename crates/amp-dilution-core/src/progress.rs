/// Trait for reporting pipeline progress.
///
/// The CLI implements it with indicatif bars. All methods have default no-op
/// implementations.
pub trait ProgressReporter: Send + Sync {
    fn on_load_start(&self, _path: &str) {}
    fn on_load_complete(&self, _rows: usize, _duration_secs: f64) {}
    fn on_compute_start(&self, _total_systems: usize) {}
    fn on_compute_progress(&self, _systems_done: usize, _total_systems: usize) {}
    fn on_compute_complete(&self, _systems: usize, _duration_secs: f64) {}
    fn on_write_start(&self, _path: &str) {}
    fn on_write_complete(&self, _rows: usize, _duration_secs: f64) {}
    fn on_plot_start(&self, _path: &str) {}
    fn on_plot_complete(&self, _duration_secs: f64) {}
}

/// No-op progress reporter for silent operation.
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {}
