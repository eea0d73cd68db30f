//! Error types for headered CSV reading and writing

use std::error::Error as StdError;
use std::fmt;
use std::io;
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur when working with CSV records
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CsvError {
    /// The column list names the same column more than once
    #[error("multiple indices with the same name '{0}'")]
    DuplicateColumn(String),

    /// A row does not have one field per column
    #[error("record on line {line}: wrong number of fields (expected {expected}, got {actual})")]
    FieldCountMismatch {
        line: u64,
        expected: usize,
        actual: usize,
    },

    /// Failure reported by the source codec
    #[error(transparent)]
    Read(SharedError<csv::Error>),

    /// Failure reported by the sink
    #[error(transparent)]
    Write(SharedError<io::Error>),

    /// Misconfiguration or out-of-order use of a reader or writer
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("IO error: {0}")]
    Io(#[source] SharedError<io::Error>),
}

/// An error raised by the codec or the underlying stream, passed on untouched.
///
/// Display and `source()` both go straight to the wrapped error, so callers
/// can downcast it (for example to [`io::Error`] to inspect its kind). Clones
/// share the same error; two values are equal only if they share it.
#[derive(Debug)]
pub struct SharedError<E>(Arc<E>);

impl<E> SharedError<E> {
    /// Wrap `err`
    pub fn new(err: E) -> Self {
        Self(Arc::new(err))
    }

    /// The wrapped error
    pub fn get_ref(&self) -> &E {
        &self.0
    }
}

impl<E> Clone for SharedError<E> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<E> PartialEq for SharedError<E> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl<E> Eq for SharedError<E> {}

impl<E: fmt::Display> fmt::Display for SharedError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl<E: StdError + 'static> StdError for SharedError<E> {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(&*self.0)
    }
}

impl CsvError {
    /// Create a field-count mismatch error.
    pub fn field_count_mismatch(line: u64, expected: usize, actual: usize) -> Self {
        Self::FieldCountMismatch {
            line,
            expected,
            actual,
        }
    }

    /// Create a duplicate column error
    pub fn duplicate_column(name: impl Into<String>) -> Self {
        Self::DuplicateColumn(name.into())
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Wrap an error returned by the sink
    pub fn sink(err: io::Error) -> Self {
        Self::Write(SharedError::new(err))
    }

    /// Translate an error raised while decoding a record.
    ///
    /// The codec's own unequal-length check becomes [`CsvError::FieldCountMismatch`]
    /// with the line number the codec reported; everything else is passed on
    /// as it is.
    pub fn from_read(err: csv::Error) -> Self {
        if let csv::ErrorKind::UnequalLengths {
            pos,
            expected_len,
            len,
        } = err.kind()
        {
            return Self::field_count_mismatch(
                pos.as_ref().map_or(0, csv::Position::line),
                *expected_len as usize,
                *len as usize,
            );
        }
        Self::Read(SharedError::new(err))
    }

    /// Translate an error raised while encoding or flushing a record.
    ///
    /// Sink failures keep their [`io::Error`]; anything else the codec
    /// reports is wrapped in one.
    pub fn from_write(err: csv::Error) -> Self {
        if !err.is_io_error() {
            return Self::sink(io::Error::other(err));
        }
        match err.into_kind() {
            csv::ErrorKind::Io(e) => Self::sink(e),
            kind => Self::sink(io::Error::other(format!("{kind:?}"))),
        }
    }

    /// The underlying I/O error, if this failure came from a stream
    pub fn io_error(&self) -> Option<&io::Error> {
        match self {
            Self::Write(err) | Self::Io(err) => Some(err.get_ref()),
            Self::Read(err) => match err.get_ref().kind() {
                csv::ErrorKind::Io(e) => Some(e),
                _ => None,
            },
            _ => None,
        }
    }

    /// Get the line number if available
    pub fn line_number(&self) -> Option<u64> {
        match self {
            Self::FieldCountMismatch { line, .. } => Some(*line),
            Self::Read(err) => err.get_ref().position().map(csv::Position::line),
            _ => None,
        }
    }
}

impl From<io::Error> for CsvError {
    fn from(e: io::Error) -> Self {
        Self::Io(SharedError::new(e))
    }
}

/// Result type alias for CSV operations
pub type CsvResult<T> = std::result::Result<T, CsvError>;
