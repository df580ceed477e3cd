use chrono::Local;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

pub const DEFAULT_ERROR_LOG: &str = "logs/error.log";

const SEPARATOR_WIDTH: usize = 80;

/// Append-only plain-text log of caught failures.
#[derive(Debug, Clone)]
pub struct ErrorLog {
    path: PathBuf,
}

impl ErrorLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one entry: timestamp and message, the trace when given, then a
    /// separator line. The file and its directory are created on first use.
    pub fn record(&self, message: &str, trace: Option<&str>) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut entry = format!(
            "[{}] ERROR: {}\n",
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            message
        );
        if let Some(trace) = trace {
            entry.push_str("Traceback:\n");
            entry.push_str(trace.trim_end());
            entry.push('\n');
        }
        entry.push_str(&"-".repeat(SEPARATOR_WIDTH));
        entry.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(entry.as_bytes())
    }
}
