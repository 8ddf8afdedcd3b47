//! Error types for the tuning model.

use thiserror::Error;

/// Broad classification of a writer failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkErrorKind {
    /// The underlying stream could not be written.
    Io,
    /// The element structure was invalid (bad name, unbalanced end, ...).
    Format,
}

impl SinkErrorKind {
    pub fn name(self) -> &'static str {
        match self {
            SinkErrorKind::Io => "I/O error",
            SinkErrorKind::Format => "format error",
        }
    }
}

/// Error raised by an [`ElementSink`](crate::xml::ElementSink) implementation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{}: {message}", .kind.name())]
pub struct SinkError {
    pub kind: SinkErrorKind,
    pub message: String,
}

impl SinkError {
    pub fn io(message: impl Into<String>) -> Self {
        Self {
            kind: SinkErrorKind::Io,
            message: message.into(),
        }
    }

    pub fn format(message: impl Into<String>) -> Self {
        Self {
            kind: SinkErrorKind::Format,
            message: message.into(),
        }
    }
}

/// Failure to persist a frequency list.
///
/// Sink errors are absorbed into this value together with the target they
/// were writing to, so callers get a single descriptive message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SerializeError {
    /// The sink rejected an element.
    #[error("Failed to write {item} to {target}: {source}")]
    Write {
        /// Description of what was being written.
        item: String,
        /// Name of the sink target (usually a file name).
        target: String,
        source: SinkError,
    },
}

impl SerializeError {
    /// The underlying sink error kind.
    pub fn kind(&self) -> SinkErrorKind {
        match self {
            SerializeError::Write { source, .. } => source.kind,
        }
    }
}
