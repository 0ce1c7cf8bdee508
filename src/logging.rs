//! File-backed logging.
//!
//! The UI owns the terminal, so log output goes to a daily-rolling file under
//! the data directory instead of stderr. Filtering follows `RUST_LOG` and
//! defaults to `info`.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber. The returned guard must stay alive for the
/// whole process or buffered log lines are lost.
pub fn init(data_dir: &Path) -> WorkerGuard {
    let appender = tracing_appender::rolling::daily(data_dir.join("logs"), "groovezilla.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();
    guard
}
