//! # Append-Only Sinks
//!
//! The record engine never touches files directly. Registrations and
//! demerit events are handed, one line at a time, to an [`AppendSink`]
//! supplied by the caller.
//!
//! - [`FileSink`] opens its file in append mode for every line and closes
//!   it before returning, on success and on error alike.
//! - [`MemorySink`] keeps lines in a shared buffer. Clones share the
//!   buffer, so a test can keep one handle and give another to a record.
//!   It can also be built to refuse every write.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use thiserror::Error;

use dlr_core::SinkPaths;

/// Failure to append a line.
#[derive(Error, Debug)]
pub enum SinkError {
    /// The underlying file could not be opened or written.
    #[error("sink {sink}: {source}")]
    Io {
        /// Sink description (usually the file path).
        sink: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The sink refused the write.
    #[error("sink {0} rejected write")]
    Rejected(String),
}

/// An append-only, line-oriented log target.
pub trait AppendSink: Send + Sync + std::fmt::Debug {
    /// Append one line. The sink adds the line terminator.
    fn append(&self, line: &str) -> Result<(), SinkError>;

    /// Human-readable name used in logs.
    fn name(&self) -> String;
}

// ─── File sink ───────────────────────────────────────────────────────

/// Appends lines to a file, opening and closing it per write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    /// Create a sink writing to `path`. The file is created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Destination path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AppendSink for FileSink {
    fn append(&self, line: &str) -> Result<(), SinkError> {
        let io_err = |source| SinkError::Io {
            sink: self.path.display().to_string(),
            source,
        };
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(io_err)?;
        writeln!(file, "{line}").map_err(io_err)
    }

    fn name(&self) -> String {
        self.path.display().to_string()
    }
}

// ─── Memory sink ─────────────────────────────────────────────────────

/// In-memory sink with a shared line buffer.
#[derive(Debug, Clone)]
pub struct MemorySink {
    label: String,
    lines: Arc<Mutex<Vec<String>>>,
    reject: bool,
}

impl MemorySink {
    /// An empty sink that accepts every line.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            lines: Arc::new(Mutex::new(Vec::new())),
            reject: false,
        }
    }

    /// A sink that refuses every write.
    pub fn rejecting(label: impl Into<String>) -> Self {
        Self {
            reject: true,
            ..Self::new(label)
        }
    }

    /// Copy of the lines written so far.
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }

    /// Number of lines written so far.
    pub fn len(&self) -> usize {
        self.lines.lock().len()
    }

    /// Whether nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.lines.lock().is_empty()
    }
}

impl AppendSink for MemorySink {
    fn append(&self, line: &str) -> Result<(), SinkError> {
        if self.reject {
            return Err(SinkError::Rejected(self.label.clone()));
        }
        self.lines.lock().push(line.to_string());
        Ok(())
    }

    fn name(&self) -> String {
        self.label.clone()
    }
}

// ─── Sink pair ───────────────────────────────────────────────────────

/// The two logs a driver record writes to.
#[derive(Debug, Clone)]
pub struct RecordSinks {
    /// Receives `personID,firstName,lastName,address,birthDate` lines.
    pub registrations: Arc<dyn AppendSink>,
    /// Receives `personID,date,points,status` lines.
    pub demerits: Arc<dyn AppendSink>,
}

impl RecordSinks {
    /// Pair two sinks.
    pub fn new(registrations: Arc<dyn AppendSink>, demerits: Arc<dyn AppendSink>) -> Self {
        Self {
            registrations,
            demerits,
        }
    }

    /// File-backed sinks at the configured paths.
    pub fn from_paths(paths: &SinkPaths) -> Self {
        Self::new(
            Arc::new(FileSink::new(&paths.registrations)),
            Arc::new(FileSink::new(&paths.demerits)),
        )
    }

    /// Pair two memory sinks, returning the handles for inspection.
    pub fn in_memory() -> (Self, MemorySink, MemorySink) {
        let registrations = MemorySink::new("registrations");
        let demerits = MemorySink::new("demerits");
        let sinks = Self::new(
            Arc::new(registrations.clone()),
            Arc::new(demerits.clone()),
        );
        (sinks, registrations, demerits)
    }
}

impl Default for RecordSinks {
    fn default() -> Self {
        Self::from_paths(&SinkPaths::default())
    }
}
