//! Error-related types for loading, writing and packing an EPUB.

pub use crate::archive::errors::{ArchiveError, ArchiveResult};
pub use crate::fix::errors::FixError;

/// Alias for `Result<T, EpubFixError>`.
pub type EpubFixResult<T> = Result<T, EpubFixError>;

/// Unified error type.
///
/// Only archive-level failures are fatal; problems found while fixing are
/// collected as [`FixError`] diagnostics within a
/// [`FixReport`](crate::fix::FixReport) instead.
#[non_exhaustive]
#[derive(thiserror::Error, Debug)]
pub enum EpubFixError {
    /// Reading, writing or packing an archive has failed.
    #[error(transparent)]
    Archive(#[from] ArchiveError),

    /// An IO exception occurred outside of archive access.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
