use std::io;
use std::path::PathBuf;
use std::string::FromUtf8Error;

/// Alias for `Result<T, ArchiveError>`.
pub type ArchiveResult<T> = Result<T, ArchiveError>;

/// Possible errors when reading or writing an [`EpubArchive`](super::EpubArchive).
#[non_exhaustive]
#[derive(thiserror::Error, Debug)]
pub enum ArchiveError {
    /// The archive itself is unreadable due to not existing,
    /// unsupported format, or malformed state.
    ///
    /// This error is thrown **before** any fix pass runs.
    ///
    /// Path *is* [`None`] when a reader `R: Read + Seek` is supplied through
    /// [`ArchiveOptions::read`](super::ArchiveOptions::read).
    #[error("[UnreadableArchive - `{path:?}`]: {source}")]
    UnreadableArchive {
        /// The root cause of this error.
        source: io::Error,
        /// The path responsible for triggering the error, if applicable.
        path: Option<PathBuf>,
    },

    /// An entry exists within the archive, although is unable to be read,
    /// typically I/O or a corrupt compressed stream.
    #[error("[CannotRead - `{entry}`]: {source}")]
    CannotRead {
        /// The root cause of the error.
        source: io::Error,
        /// The archive entry responsible for triggering the error.
        entry: String,
    },

    /// An entry classified as text is not valid UTF-8.
    ///
    /// Enable [`ArchiveOptions::binary_fallback`](super::ArchiveOptions::binary_fallback)
    /// to keep such entries as opaque bytes instead.
    #[error("[InvalidUtf8Entry - `{entry}`]: Entry cannot be read as UTF-8")]
    InvalidUtf8Entry {
        /// The root cause of the error.
        source: FromUtf8Error,
        /// The archive entry responsible for triggering the error.
        entry: String,
    },

    /// Writing an entry into the output archive failed.
    ///
    /// Entry *is* [`None`] when finalizing the archive (central directory) fails.
    #[error("[CannotWrite - `{entry:?}`]: {source}")]
    CannotWrite {
        /// The root cause of the error.
        source: io::Error,
        /// The archive entry responsible for triggering the error, if applicable.
        entry: Option<String>,
    },

    /// The output archive file could not be created or persisted.
    #[error("[UnwritableArchive - `{path:?}`]: {source}")]
    UnwritableArchive {
        /// The root cause of this error.
        source: io::Error,
        /// The destination path.
        path: PathBuf,
    },
}
