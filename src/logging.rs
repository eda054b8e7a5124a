use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Environment variable holding the tracing filter directive
pub const LOG_ENV: &str = "HAJJ_LOG";

fn filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Sends tracing output to `log_path`, since the terminal UI owns stdout.
///
/// Falls back to stderr when the file cannot be opened. Calling this twice is
/// harmless; the second subscriber is ignored.
pub fn init(log_path: &Path) {
    let file = log_path
        .parent()
        .map_or(Ok(()), fs::create_dir_all)
        .and_then(|_| OpenOptions::new().create(true).append(true).open(log_path));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter())
        .with_target(false);

    let result = match file {
        Ok(file) => builder
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .try_init(),
        Err(err) => {
            eprintln!("hajj: cannot open log file {}: {err}", log_path.display());
            builder.with_writer(std::io::stderr).try_init()
        }
    };
    // already initialised (tests, repeated calls)
    let _ = result;
}
