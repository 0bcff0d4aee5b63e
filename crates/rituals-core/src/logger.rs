//! Append-only JSON-lines event log.
//!
//! Logging is best-effort telemetry. [`EventLog::append`] reports failures
//! as [`LogError`]; [`EventLog::record`] is the call-site policy that
//! discards them, so a full disk or a read-only directory never interrupts
//! a ritual. The only reader is the launcher, and it only reads after the
//! writing process has exited.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::LogError;
use crate::events::{LogEvent, LogRecord};

/// A per-ritual log file.
#[derive(Debug, Clone)]
pub struct EventLog {
    path: PathBuf,
}

impl EventLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one timestamped record as a single line.
    ///
    /// # Errors
    ///
    /// Returns an error if the event cannot be encoded or the file cannot be
    /// opened or written.
    pub fn append(&self, event: &LogEvent) -> Result<(), LogError> {
        let record = LogRecord::now(event.clone());
        let mut line = serde_json::to_string(&record)?;
        line.push('\n');

        let io_err = |source| LogError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(io_err)?;
            }
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(io_err)?;
        // One write call per line keeps appends whole-line.
        file.write_all(line.as_bytes()).map_err(io_err)?;
        Ok(())
    }

    /// Fire-and-forget append. Failures are discarded here.
    pub fn record(&self, event: &LogEvent) {
        match self.append(event) {
            Ok(()) => tracing::debug!(event = event.name(), path = %self.path.display(), "logged"),
            Err(e) => tracing::debug!(event = event.name(), "log write dropped: {e}"),
        }
    }

    /// The last record in this log, if any. See [`read_last`].
    pub fn last(&self) -> Option<serde_json::Value> {
        read_last(&self.path)
    }
}

/// Parse only the final non-empty line of a JSON-lines file.
///
/// A missing, empty or unreadable file and a corrupted final line (for
/// example a partial write from a crash) all read as "no entry".
pub fn read_last(path: &Path) -> Option<serde_json::Value> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            tracing::debug!(path = %path.display(), "no log to read: {e}");
            return None;
        }
    };
    let last = content.lines().rev().find(|l| !l.trim().is_empty())?;
    match serde_json::from_str::<serde_json::Value>(last) {
        Ok(value) if value.is_object() => Some(value),
        Ok(_) => None,
        Err(e) => {
            tracing::debug!(path = %path.display(), "last log line unreadable: {e}");
            None
        }
    }
}

/// Guarantees exactly one terminal event for a started session.
///
/// Armed with a fallback event describing an interrupted session. Calling
/// [`TerminalRecord::commit`] writes the real terminal event instead; if the
/// guard is dropped uncommitted (early return, `?`, panic unwind) the
/// fallback is written.
#[must_use = "dropping the guard immediately logs the fallback event"]
pub struct TerminalRecord<'a> {
    log: &'a EventLog,
    fallback: Option<LogEvent>,
}

impl<'a> TerminalRecord<'a> {
    pub fn arm(log: &'a EventLog, fallback: LogEvent) -> Self {
        Self {
            log,
            fallback: Some(fallback),
        }
    }

    /// Write the terminal event. Consumes the guard so it cannot fire twice.
    pub fn commit(mut self, event: LogEvent) {
        self.fallback = None;
        self.log.record(&event);
    }
}

impl Drop for TerminalRecord<'_> {
    fn drop(&mut self) {
        if let Some(event) = self.fallback.take() {
            tracing::debug!(event = event.name(), "session ended without commit");
            self.log.record(&event);
        }
    }
}
