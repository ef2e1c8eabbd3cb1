//! Logging setup.
//!
//! Console output is plain text with local-time timestamps or JSON lines.
//! When a log directory is configured, everything is also written to a
//! daily-rotated file through a non-blocking writer.

use chrono::Local;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::Writer, time::FormatTime},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use crate::config::{LogConfig, LogFormat};
use crate::fs::OsFileSystem;
use crate::utils::fs::ensure_dir_all_with_op;

/// Log file name prefix; the appender adds the date.
pub const LOG_FILE_PREFIX: &str = "clustercode.log";

/// Timer formatting timestamps in the local timezone.
#[derive(Debug, Clone, Copy)]
struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        let now = Local::now();
        write!(w, "{}", now.format("%Y-%m-%dT%H:%M:%S%.3f%:z"))
    }
}

/// Filter directive used when `RUST_LOG` is not set.
pub fn default_filter(level: &str) -> String {
    format!("clustercode={level},pipeline_common={level}")
}

/// Install the global subscriber.
///
/// Returns the file writer guard when file logging is enabled; keep it alive
/// for the lifetime of the process so buffered lines are flushed.
pub fn init_logging(config: &LogConfig) -> crate::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter(&config.level)))
        .map_err(|e| crate::Error::config(format!("invalid log level '{}': {e}", config.level)))?;

    let console = match config.format {
        LogFormat::Plain => fmt::layer()
            .with_writer(std::io::stderr)
            .with_timer(LocalTimer)
            .boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_timer(LocalTimer)
            .boxed(),
    };

    let (file, guard) = match &config.dir {
        Some(dir) => {
            ensure_dir_all_with_op(&OsFileSystem, "creating log directory", dir)?;
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_timer(LocalTimer)
                .boxed();
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file)
        .try_init()
        .map_err(|e| crate::Error::Other(format!("Failed to set global default subscriber: {e}")))?;

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter() {
        assert_eq!(
            default_filter("debug"),
            "clustercode=debug,pipeline_common=debug"
        );
        assert!(EnvFilter::try_new(default_filter("info")).is_ok());
    }
}
