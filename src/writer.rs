//! Serializes an [`EpubArchive`] back into a zip container.

pub(crate) mod zip;

use crate::archive::errors::{ArchiveError, ArchiveResult};
use crate::archive::{Entry, EpubArchive};
use crate::consts;
use crate::writer::zip::ZipWriter;
use std::io::{Cursor, Seek, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Default deflate level for every entry besides `mimetype`.
pub(crate) const DEFAULT_COMPRESSION: u8 = 6;

impl EpubArchive {
    /// Returns [`WriteOptions`] to write this archive.
    ///
    /// # Entry order
    /// - `mimetype` (when present) is always written first and stored uncompressed.
    /// - Remaining text entries follow in their original relative order.
    /// - Binary entries are written last in their original relative order.
    pub fn write(&self) -> WriteOptions<'_> {
        WriteOptions {
            archive: self,
            compression: DEFAULT_COMPRESSION,
        }
    }
}

/// Configures and performs writing an [`EpubArchive`].
///
/// # Examples
/// ```no_run
/// # use epubfix::EpubArchive;
/// # use epubfix::errors::EpubFixResult;
/// # fn main() -> EpubFixResult<()> {
/// let archive = EpubArchive::open("book.epub")?;
/// let bytes = archive.write().compression(9).to_vec()?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct WriteOptions<'a> {
    archive: &'a EpubArchive,
    compression: u8,
}

impl WriteOptions<'_> {
    /// Deflate level `0-9` applied to every entry besides `mimetype`.
    /// A level of `0` stores entries uncompressed.
    ///
    /// Default: `6`
    pub fn compression(mut self, level: u8) -> Self {
        self.compression = level;
        self
    }

    /// Writes the archive into `writer`, returning it once finished.
    ///
    /// # Errors
    /// [`ArchiveError::CannotWrite`]: Any I/O failure while writing.
    pub fn write<W: Write + Seek>(&self, writer: W) -> ArchiveResult<W> {
        let mut zip = ZipWriter::new(writer, self.compression);
        let entries = self.archive.entries();
        let (text, binary): (Vec<&Entry>, Vec<&Entry>) = entries.partition(|entry| entry.is_text());

        // EPUB requires `mimetype` to come first, uncompressed
        if let Some(mimetype) = self.archive.get(consts::MIMETYPE) {
            zip.write_uncompressed_file(consts::MIMETYPE, mimetype.bytes())?;
        }

        for entry in text.into_iter().chain(binary) {
            if entry.path() == consts::MIMETYPE {
                continue;
            }
            zip.write_file(entry.path(), entry.bytes())?;
        }

        log::debug!("wrote {} entries", self.archive.len());
        zip.finish()
    }

    /// Writes the archive into an in-memory buffer.
    pub fn to_vec(&self) -> ArchiveResult<Vec<u8>> {
        self.write(Cursor::new(Vec::new())).map(Cursor::into_inner)
    }

    /// Writes the archive to `path`.
    ///
    /// Content is written to a temporary file within the destination directory
    /// and renamed over `path` only once complete, so a failed write never leaves
    /// a partial archive behind. Saving over the source file is supported.
    ///
    /// # Errors
    /// - [`ArchiveError::UnwritableArchive`]: The destination cannot be created or replaced.
    /// - [`ArchiveError::CannotWrite`]: Any I/O failure while writing.
    pub fn save(&self, path: impl AsRef<Path>) -> ArchiveResult<()> {
        persist_atomically(path.as_ref(), |file| self.write(file).map(|_| ()))
    }
}

/// Runs `write` against a temporary file next to `path`,
/// then renames it over `path` on success.
pub(crate) fn persist_atomically(
    path: &Path,
    write: impl FnOnce(&mut NamedTempFile) -> ArchiveResult<()>,
) -> ArchiveResult<()> {
    let unwritable = |source| ArchiveError::UnwritableArchive {
        source,
        path: path.to_path_buf(),
    };
    let directory = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or(Path::new("."));

    let mut file = NamedTempFile::new_in(directory).map_err(unwritable)?;
    write(&mut file)?;
    file.persist(path).map_err(|error| unwritable(error.error))?;
    Ok(())
}
