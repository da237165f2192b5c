use std::env;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_FILTER: &str = "info";
const DEFAULT_LOG_PATH: &str = "./logs/amp_dil.log";

/// Pretty stdout logging plus a plain-text log file. The returned guard
/// flushes the file writer on drop, so hold it until exit.
pub fn init_logger() -> impl Drop {
    let filter = env::var("TRACING_LEVEL").unwrap_or_else(|_| DEFAULT_FILTER.to_string());
    let (filter_layer, bad_filter) = match EnvFilter::try_new(&filter) {
        Ok(layer) => (layer, false),
        Err(_) => (EnvFilter::new(DEFAULT_FILTER), true),
    };

    let log_file_path =
        PathBuf::from(env::var("LOG_FILE_PATH").unwrap_or_else(|_| DEFAULT_LOG_PATH.to_string()));
    let log_dir = log_file_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let log_name = log_file_path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "amp_dil.log".into());

    let file_appender = tracing_appender::rolling::never(log_dir, log_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stdout)
                .pretty()
                .with_file(false)
                .with_target(false)
                .without_time()
                .with_ansi(true),
        )
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .with(filter_layer)
        .init();

    if bad_filter {
        warn!("Ignoring invalid TRACING_LEVEL '{}', using '{}'", filter, DEFAULT_FILTER);
    }
    info!("Logging to stdout and {}", log_file_path.display());

    guard
}
