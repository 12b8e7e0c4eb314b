/*============================================================
  Synavera Project: Syn-HLE
  Module: synhle_core::logger
  Etiquette: Synavera Script Etiquette (Rust Profile v1.1.1)
  ------------------------------------------------------------
  Purpose:
    Structured, append-only session logging for the core
    repair and controller detection pipelines.

  Security / Safety Notes:
    Only paths, device names and architecture tags are logged;
    no preference values beyond architecture names.

  Dependencies:
    chrono for UTC stamps, sha2 for session integrity hashing.

  Operational Scope:
    Passed by reference into every pipeline; shared between
    the two pipelines when they run concurrently.

  Revision History:
    2026-03-02 COD  Ported logging cadence to Syn-HLE.
    2026-04-18 COD  Track warning count for the run report.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Append-only logging with UTC timestamps
    - Deterministic formatting for auditability
    - Graceful error propagation on I/O failures
============================================================*/

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use chrono::{SecondsFormat, Utc};
use sha2::{Digest, Sha256};

use crate::error::{HleError, Result};

/// Structured log level for Syn-HLE events.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
    Debug,
}

impl LogLevel {
    fn as_str(self) -> &'static str {
        match self {
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
            LogLevel::Debug => "DEBUG",
        }
    }

    fn always_echoed(self) -> bool {
        matches!(self, LogLevel::Warn | LogLevel::Error)
    }
}

/// Session logger writing to stderr and, optionally, an append-only file.
pub struct Logger {
    file: Option<Mutex<BufWriter<File>>>,
    path: Option<PathBuf>,
    verbose: bool,
    warnings: AtomicUsize,
}

impl Logger {
    /// Build a logger that writes to stderr and optionally to a file.
    pub fn new(path: Option<PathBuf>, verbose: bool) -> Result<Self> {
        let file = match path.as_deref() {
            Some(file_path) => Some(Mutex::new(BufWriter::new(open_append(file_path)?))),
            None => None,
        };

        Ok(Self {
            file,
            path,
            verbose,
            warnings: AtomicUsize::new(0),
        })
    }

    /// Logger with no file sink that only echoes warnings and errors.
    #[cfg(test)]
    pub fn quiet() -> Self {
        Self {
            file: None,
            path: None,
            verbose: false,
            warnings: AtomicUsize::new(0),
        }
    }

    /// Emit a log entry with the given level, code, and message.
    pub fn log<S: AsRef<str>>(&self, level: LogLevel, code: &str, message: S) {
        let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
        let payload = format!("{timestamp} [{}] [{code}] {}", level.as_str(), message.as_ref());

        if level == LogLevel::Warn {
            self.warnings.fetch_add(1, Ordering::Relaxed);
        }
        if self.verbose || level.always_echoed() {
            eprintln!("{payload}");
        }

        let Some(file) = &self.file else {
            return;
        };
        let Ok(mut guard) = file.lock() else {
            return;
        };
        if writeln!(guard, "{payload}").is_err() {
            eprintln!("{timestamp} [ERROR] [LOGGER] Failed to write to log file");
        }
        if guard.flush().is_err() {
            eprintln!("{timestamp} [WARN] [LOGGER] Failed to flush log writer");
        }
    }

    pub fn info<S: AsRef<str>>(&self, code: &str, message: S) {
        self.log(LogLevel::Info, code, message);
    }

    pub fn warn<S: AsRef<str>>(&self, code: &str, message: S) {
        self.log(LogLevel::Warn, code, message);
    }

    pub fn error<S: AsRef<str>>(&self, code: &str, message: S) {
        self.log(LogLevel::Error, code, message);
    }

    pub fn debug<S: AsRef<str>>(&self, code: &str, message: S) {
        self.log(LogLevel::Debug, code, message);
    }

    /// Number of WARN entries emitted so far this session.
    pub fn warning_count(&self) -> usize {
        self.warnings.load(Ordering::Relaxed)
    }

    /// Return the path backing this logger, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Compute and persist SHA-256 digest of the log file.
    pub fn finalize(&self) -> Result<()> {
        let Some(path) = self.path() else {
            return Ok(());
        };
        if let Some(file) = &self.file {
            if let Ok(mut guard) = file.lock() {
                guard.flush()?;
            }
        }

        let data = std::fs::read(path).map_err(|err| {
            HleError::Filesystem(format!(
                "Failed to read log for hashing {}: {err}",
                path.display()
            ))
        })?;
        let digest = Sha256::digest(&data);

        let mut hash_os = path.as_os_str().to_os_string();
        hash_os.push(".hash");
        let hash_path = PathBuf::from(hash_os);
        let name = path.file_name().unwrap_or_default().to_string_lossy();
        std::fs::write(&hash_path, format!("{digest:x}  {name}\n")).map_err(|err| {
            HleError::Filesystem(format!(
                "Failed to write hash file {}: {err}",
                hash_path.display()
            ))
        })?;
        Ok(())
    }
}

fn open_append(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|err| {
            HleError::Filesystem(format!(
                "Failed to create log directory {}: {err}",
                parent.display()
            ))
        })?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|err| {
            HleError::Filesystem(format!("Failed to open log file {}: {err}", path.display()))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_sink_receives_entries_and_hash() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("session.log");
        let logger = Logger::new(Some(path.clone()), false).unwrap();
        logger.info("INIT", "hello");
        logger.warn("PROBE", "lipo missing");
        logger.finalize().unwrap();

        let body = std::fs::read_to_string(&path).unwrap();
        assert!(body.contains("[INFO] [INIT] hello"));
        assert!(body.contains("[WARN] [PROBE] lipo missing"));
        assert_eq!(logger.warning_count(), 1);

        let hash = std::fs::read_to_string(dir.path().join("logs").join("session.log.hash")).unwrap();
        assert!(hash.trim_end().ends_with("session.log"));
        assert_eq!(hash.split_whitespace().next().unwrap().len(), 64);
    }

    #[test]
    fn quiet_logger_finalize_is_noop() {
        let logger = Logger::quiet();
        logger.debug("X", "ignored");
        assert!(logger.path().is_none());
        logger.finalize().unwrap();
    }
}
