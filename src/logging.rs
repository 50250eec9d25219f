use anyhow::{Context, Result};
use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

pub(crate) const LOG_ENV: &str = "FLOWDASH_LOG";
pub(crate) const LOG_FILE: &str = "flowdash.log";

/// Send tracing output to `flowdash.log` in `data_dir`.
///
/// The terminal belongs to the TUI, so nothing is written to stderr. The
/// level comes from `FLOWDASH_LOG` (an `EnvFilter` directive), default `info`.
pub(crate) fn init(data_dir: &Path) -> Result<()> {
    let file = open_log_file(data_dir)?;
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(true),
        )
        .try_init()
        .context("Failed to install log subscriber")?;
    Ok(())
}

fn open_log_file(data_dir: &Path) -> Result<File> {
    let path = data_dir.join(LOG_FILE);
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use std::io::Write;

    #[test]
    fn test_log_file_appends() {
        let dir = tempfile::tempdir().unwrap();
        writeln!(open_log_file(dir.path()).unwrap(), "first").unwrap();
        writeln!(open_log_file(dir.path()).unwrap(), "second").unwrap();
        let content = std::fs::read_to_string(dir.path().join(LOG_FILE)).unwrap();
        assert_eq!(content, "first\nsecond\n");
    }

    #[test]
    fn test_log_file_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(open_log_file(&dir.path().join("nope")).is_err());
    }
}
