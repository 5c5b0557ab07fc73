//! Logging setup
//!
//! Console output by default; with a log directory, a daily rolling file.

use std::path::Path;

use tracing_subscriber::EnvFilter;

/// Initialize the logger with optional file output
///
/// `level` is an env-filter directive (`info`, `comanda_client=debug`, ...).
pub fn init_logger(level: &str, log_dir: Option<&Path>) -> anyhow::Result<()> {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    if let Some(dir) = log_dir {
        std::fs::create_dir_all(dir)?;
        let file_appender = tracing_appender::rolling::daily(dir, "comanda-monitor");
        subscriber
            .with_ansi(false)
            .with_writer(file_appender)
            .init();
        return Ok(());
    }

    subscriber.init();
    Ok(())
}
