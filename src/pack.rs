//! Packs an extracted EPUB directory back into an archive.
//!
//! Packing is independent of loading and fixing: every file is copied as
//! opaque bytes, following only the `mimetype`-first convention of the writer.

use crate::archive::errors::{ArchiveError, ArchiveResult};
use crate::consts;
use crate::writer::zip::ZipWriter;
use crate::writer::{self, DEFAULT_COMPRESSION};
use std::fs;
use std::io::{self, Seek, Write};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A regular file found within the source directory.
struct PackedFile {
    path: PathBuf,
    /// `/`-separated path relative to the source directory.
    name: String,
}

impl PackedFile {
    fn read(&self) -> ArchiveResult<Vec<u8>> {
        fs::read(&self.path).map_err(|source| ArchiveError::CannotRead {
            source,
            entry: self.name.clone(),
        })
    }
}

/// Packs every regular file within `dir` into a new EPUB at `out`.
///
/// - A top-level `mimetype` file is written first and stored uncompressed.
/// - Remaining files are deflated in file-name order, named by their path relative to `dir`.
/// - `.DS_Store` files are excluded at any depth.
/// - Symbolic links are not followed.
///
/// The archive is written to a temporary file next to `out`
/// and only renamed over `out` once complete.
///
/// # Errors
/// - [`ArchiveError::UnreadableArchive`]: `dir` is not a directory or cannot be walked.
/// - [`ArchiveError::CannotRead`]: A file within `dir` cannot be read.
/// - [`ArchiveError::CannotWrite`] / [`ArchiveError::UnwritableArchive`]:
///   Writing `out` failed.
///
/// # Examples
/// ```no_run
/// # use epubfix::errors::EpubFixResult;
/// # fn main() -> EpubFixResult<()> {
/// epubfix::pack_directory("extracted/", "book.epub")?;
/// # Ok(())
/// # }
/// ```
pub fn pack_directory(dir: impl AsRef<Path>, out: impl AsRef<Path>) -> ArchiveResult<()> {
    let files = collect_files(dir.as_ref())?;

    writer::persist_atomically(out.as_ref(), |file| {
        write_files(&files, file).map(|_| ())
    })
}

/// Packs every regular file within `dir` into `writer`, returning it once finished.
///
/// See [`pack_directory`] for entry selection and possible errors.
pub fn pack_directory_to<W: Write + Seek>(dir: impl AsRef<Path>, writer: W) -> ArchiveResult<W> {
    let files = collect_files(dir.as_ref())?;
    write_files(&files, writer)
}

fn collect_files(dir: &Path) -> ArchiveResult<Vec<PackedFile>> {
    let unreadable = |source| ArchiveError::UnreadableArchive {
        source,
        path: Some(dir.to_path_buf()),
    };

    if !dir.is_dir() {
        return Err(unreadable(io::Error::new(
            io::ErrorKind::NotADirectory,
            "source is not a directory",
        )));
    }

    let mut files = Vec::new();

    for entry in WalkDir::new(dir).follow_links(false).sort_by_file_name() {
        let entry = entry.map_err(|error| unreadable(error.into()))?;

        if !entry.file_type().is_file() {
            continue;
        } else if entry.file_name() == consts::DS_STORE {
            log::debug!("excluding `{}`", entry.path().display());
            continue;
        }

        let relative = entry.path().strip_prefix(dir).unwrap_or(entry.path());
        let Some(name) = entry_name(relative) else {
            log::warn!("skipping non UTF-8 path `{}`", entry.path().display());
            continue;
        };
        files.push(PackedFile {
            path: entry.into_path(),
            name,
        });
    }
    log::debug!("packing {} files from `{}`", files.len(), dir.display());
    Ok(files)
}

/// Joins the components of a relative path with `/`.
fn entry_name(relative: &Path) -> Option<String> {
    relative
        .components()
        .map(|component| component.as_os_str().to_str())
        .collect::<Option<Vec<_>>>()
        .map(|components| components.join("/"))
}

fn write_files<W: Write + Seek>(files: &[PackedFile], writer: W) -> ArchiveResult<W> {
    let mut zip = ZipWriter::new(writer, DEFAULT_COMPRESSION);
    let (mimetype, rest): (Vec<&PackedFile>, Vec<&PackedFile>) =
        files.iter().partition(|file| file.name == consts::MIMETYPE);

    for file in mimetype {
        zip.write_uncompressed_file(&file.name, &file.read()?)?;
    }
    for file in rest {
        zip.write_file(&file.name, &file.read()?)?;
    }
    zip.finish()
}
