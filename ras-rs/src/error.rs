use std::io;
use thiserror::Error;

/// Convenience result type used throughout the crate.
pub type Result<T> = std::result::Result<T, RasError>;

/// Represents all possible errors that can occur in the RAS library.
///
/// Errors raised while opening an archive abort the open; errors raised by a
/// file stream only affect that stream.
#[derive(Debug, Error)]
pub enum RasError {
    /// The input does not start with a RAS signature. Another decoder may accept it.
    #[error("Unsupported archive format (signature {0})")]
    UnsupportedFormat(String),
    /// An allocation for a table block or payload failed.
    #[error("Out of memory")]
    OutOfMemory,
    /// The archive tables are malformed.
    #[error("Archive is corrupt: {0}")]
    Corrupt(String),
    /// No entry exists at the given path.
    #[error("Entry not found: {0}")]
    NotFound(String),
    /// The path names a directory where a file was expected.
    #[error("Not a file: {0}")]
    NotAFile(String),
    /// The path names a file where a directory was expected.
    #[error("Not a directory: {0}")]
    NotADirectory(String),
    /// Any mutation attempt on the archive.
    #[error("Archive is read-only")]
    ReadOnly,
    /// A seek landed outside the entry.
    #[error("Seek to {offset} is past the end of a {len} byte entry")]
    PastEndOfFile { offset: u64, len: u64 },
    /// A glob pattern could not be compiled.
    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),
    /// Error from the underlying byte source.
    #[error("I/O error: {0}")]
    Io(#[source] io::Error),
}

impl RasError {
    pub(crate) fn corrupt(reason: impl Into<String>) -> Self {
        RasError::Corrupt(reason.into())
    }

    /// Maps an error raised while reading table data. A short read there means
    /// the table is truncated, which is a property of the archive and not of
    /// the source.
    pub(crate) fn from_table_read(error: io::Error, what: &str) -> Self {
        match error.kind() {
            io::ErrorKind::UnexpectedEof => RasError::Corrupt(format!("truncated {what}")),
            _ => RasError::from(error),
        }
    }
}

impl From<io::Error> for RasError {
    fn from(error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::OutOfMemory => RasError::OutOfMemory,
            _ => RasError::Io(error),
        }
    }
}

impl From<glob::PatternError> for RasError {
    fn from(error: glob::PatternError) -> Self {
        RasError::InvalidPattern(error.to_string())
    }
}

/// Lets the std `Read`/`Seek`/`Write` impls of file streams report RAS errors.
impl From<RasError> for io::Error {
    fn from(error: RasError) -> Self {
        let kind = match error {
            RasError::Io(inner) => return inner,
            RasError::NotFound(_) => io::ErrorKind::NotFound,
            RasError::ReadOnly => io::ErrorKind::PermissionDenied,
            RasError::PastEndOfFile { .. } => io::ErrorKind::InvalidInput,
            RasError::OutOfMemory => io::ErrorKind::OutOfMemory,
            RasError::UnsupportedFormat(_) => io::ErrorKind::Unsupported,
            RasError::InvalidPattern(_) => io::ErrorKind::InvalidInput,
            RasError::Corrupt(_) | RasError::NotAFile(_) | RasError::NotADirectory(_) => {
                io::ErrorKind::InvalidData
            }
        };
        io::Error::new(kind, error)
    }
}
