//! Run log reporting.
//!
//! The pipeline writes progress through an explicit reporter handed down
//! from main rather than a process-global logger, so every entry belongs to
//! the run that produced it. Library-internal diagnostics still go through
//! the `log` facade.

use chrono::Local;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Level {
    Debug,
    Info,
    Error,
}

impl Level {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Error => "ERROR",
        }
    }
}

/// Run log writer passed through the pipeline stages
pub struct Reporter {
    log: File,
    verbose: bool,
}

impl Reporter {
    /// Open the run log at `path`, appending to an existing file.
    pub fn open(path: &Path, verbose: bool) -> std::io::Result<Self> {
        let log = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self { log, verbose })
    }

    /// Record a progress entry; mirrored to stderr in verbose mode.
    pub fn info(&mut self, message: &str) {
        self.append(Level::Info, message);
        if self.verbose {
            eprintln!("{message}");
        }
    }

    /// Record a detail entry; written only in verbose mode.
    pub fn debug(&mut self, message: &str) {
        if self.verbose {
            self.append(Level::Debug, message);
            eprintln!("{message}");
        }
    }

    /// Record a failure; always mirrored to stderr.
    pub fn error(&mut self, message: &str) {
        self.append(Level::Error, message);
        eprintln!("error: {message}");
    }

    fn append(&mut self, level: Level, message: &str) {
        let line = format!(
            "{} - {} - {}",
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            level.as_str(),
            message
        );
        // A full disk must not kill the conversion itself
        let _ = writeln!(self.log, "{line}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_carry_level_and_message() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.log");

        let mut reporter = Reporter::open(&path, false).unwrap();
        reporter.info("starting up");
        reporter.error("something broke");

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains(" - INFO - starting up"));
        assert!(contents.contains(" - ERROR - something broke"));
    }

    #[test]
    fn test_debug_entries_skipped_unless_verbose() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.log");

        let mut reporter = Reporter::open(&path, false).unwrap();
        reporter.debug("hidden detail");
        drop(reporter);
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(!contents.contains("hidden detail"));

        let mut reporter = Reporter::open(&path, true).unwrap();
        reporter.debug("visible detail");
        drop(reporter);
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains(" - DEBUG - visible detail"));
    }

    #[test]
    fn test_open_appends_to_existing_log() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.log");

        Reporter::open(&path, false).unwrap().info("first run");
        Reporter::open(&path, false).unwrap().info("second run");

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("first run"));
        assert!(contents.contains("second run"));
    }
}
