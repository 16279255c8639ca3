use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

const LOG_FILE_PREFIX: &str = "storeperf.log";

/// Installs the global subscriber: console output plus a daily-rolling file
/// in `log_dir`. `RUST_LOG` wins over the `info` default.
///
/// The returned guard flushes the file writer when dropped, so `main` has to
/// hold it until the run ends.
pub fn init(log_dir: &Path) -> anyhow::Result<WorkerGuard> {
    std::fs::create_dir_all(log_dir)?;

    let file_appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_PREFIX);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stdout.and(file_writer))
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    Ok(guard)
}
