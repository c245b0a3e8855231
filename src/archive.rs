//! In-memory EPUB archive: entries are classified as text or binary when loaded
//! and keep their order of first appearance for writing.

pub mod errors;
mod zip;

use crate::archive::errors::{ArchiveError, ArchiveResult};
use crate::consts;
use crate::util::uri;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

/// An entry of an [`EpubArchive`], identified by its path within the archive.
#[derive(Clone, Debug, PartialEq)]
pub struct Entry {
    path: String,
    content: EntryContent,
}

/// The content of an [`Entry`].
#[derive(Clone, Debug, PartialEq)]
pub enum EntryContent {
    /// Markup, metadata or stylesheet content decoded as UTF-8.
    ///
    /// Fix passes mutate this variant only.
    Text(String),
    /// Opaque bytes, passed through untouched.
    Binary(Vec<u8>),
}

impl Entry {
    pub(crate) fn new(path: String, content: EntryContent) -> Self {
        Self { path, content }
    }

    /// The entry name within the archive, using `/` separators.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn content(&self) -> &EntryContent {
        &self.content
    }

    /// Returns the decoded text if this is a text entry.
    pub fn text(&self) -> Option<&str> {
        match &self.content {
            EntryContent::Text(text) => Some(text),
            EntryContent::Binary(_) => None,
        }
    }

    /// The raw bytes of this entry, as they will be written.
    pub fn bytes(&self) -> &[u8] {
        match &self.content {
            EntryContent::Text(text) => text.as_bytes(),
            EntryContent::Binary(bytes) => bytes,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self.content, EntryContent::Text(_))
    }

    /// `true` for `html`/`xhtml` content documents visited by markup passes.
    pub fn is_content_document(&self) -> bool {
        self.is_text() && is_content_document(&self.path)
    }
}

/// Returns `true` if an entry at `path` is held as text.
///
/// Text entries are named exactly `mimetype` or have one of the suffixes
/// `.html .xhtml .htm .xml .svg .css .opf .ncx`; everything else is binary.
pub fn is_text_path(path: &str) -> bool {
    uri::basename(path) == consts::MIMETYPE
        || uri::suffix(path).is_some_and(|suffix| consts::TEXT_EXTENSIONS.contains(&suffix))
}

pub(crate) fn is_content_document(path: &str) -> bool {
    uri::extension(path).is_some_and(|extension| consts::CONTENT_EXTENSIONS.contains(&extension))
}

/// The text and binary entries of an EPUB, held entirely in memory.
///
/// # Examples
/// - Loading, fixing and writing an EPUB:
/// ```no_run
/// # use epubfix::errors::EpubFixResult;
/// # use epubfix::EpubArchive;
/// # fn main() -> EpubFixResult<()> {
/// let mut archive = EpubArchive::open("book.epub")?;
/// let report = archive.fix();
///
/// for fix in report.fixes() {
///     println!("{fix}");
/// }
/// archive.write().save("fixed.epub")?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EpubArchive {
    entries: Vec<Entry>,
}

impl EpubArchive {
    /// Opens an EPUB file with default [`ArchiveOptions`].
    ///
    /// # Errors
    /// - [`ArchiveError::UnreadableArchive`]: The path does not exist or is not a zip container.
    /// - [`ArchiveError::InvalidUtf8Entry`]: A text entry is not valid UTF-8.
    /// - [`ArchiveError::CannotRead`]: An entry could not be decompressed.
    pub fn open(path: impl AsRef<Path>) -> ArchiveResult<Self> {
        ArchiveOptions::new().open(path)
    }

    /// Reads an EPUB from any implementation of [`Read`] + [`Seek`]
    /// with default [`ArchiveOptions`].
    ///
    /// See [`Self::open`] for the possible errors.
    pub fn read<R: Read + Seek>(reader: R) -> ArchiveResult<Self> {
        ArchiveOptions::new().read(reader)
    }

    /// Returns [`ArchiveOptions`] to configure how an archive is loaded.
    pub fn options() -> ArchiveOptions {
        ArchiveOptions::new()
    }

    /// Inserts an entry, replacing the content of an existing entry with the same
    /// path while keeping its original position.
    pub fn insert(&mut self, path: impl Into<String>, content: EntryContent) {
        let path = path.into();

        match self.get_mut(&path) {
            Some(entry) => entry.content = content,
            None => self.entries.push(Entry::new(path, content)),
        }
    }

    pub fn get(&self, path: &str) -> Option<&Entry> {
        self.entries.iter().find(|entry| entry.path == path)
    }

    fn get_mut(&mut self, path: &str) -> Option<&mut Entry> {
        self.entries.iter_mut().find(|entry| entry.path == path)
    }

    /// Returns the text of the entry at `path`, if it exists and is a text entry.
    pub fn text(&self, path: &str) -> Option<&str> {
        self.get(path).and_then(Entry::text)
    }

    /// Replaces the text of an existing text entry.
    ///
    /// Returns `false` if no text entry exists at `path`.
    pub fn set_text(&mut self, path: &str, text: String) -> bool {
        match self.get_mut(path) {
            Some(Entry {
                content: EntryContent::Text(current),
                ..
            }) => {
                *current = text;
                true
            }
            _ => false,
        }
    }

    /// All entries in order of first appearance.
    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter()
    }

    /// All text entries as `(path, text)` in order of first appearance.
    pub fn text_entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .filter_map(|entry| entry.text().map(|text| (entry.path(), text)))
    }

    /// All text entries as `(path, text)`, mutable.
    pub(crate) fn text_entries_mut(&mut self) -> impl Iterator<Item = (&str, &mut String)> {
        self.entries.iter_mut().filter_map(|entry| match &mut entry.content {
            EntryContent::Text(text) => Some((entry.path.as_str(), text)),
            EntryContent::Binary(_) => None,
        })
    }

    /// `html`/`xhtml` content documents as `(path, text)`, mutable.
    pub(crate) fn content_documents_mut(&mut self) -> impl Iterator<Item = (&str, &mut String)> {
        self.text_entries_mut()
            .filter(|(path, _)| is_content_document(path))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Options to configure how an [`EpubArchive`] is loaded.
///
/// # Examples
/// ```no_run
/// # use epubfix::EpubArchive;
/// let archive = EpubArchive::options()
///     .binary_fallback(true)
///     .open("book.epub");
/// ```
#[derive(Clone, Debug, Default)]
pub struct ArchiveOptions {
    binary_fallback: bool,
}

impl ArchiveOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// When `true`, a text entry that is not valid UTF-8 is kept as a binary
    /// entry instead of failing with [`ArchiveError::InvalidUtf8Entry`].
    ///
    /// Fix passes never see such entries.
    ///
    /// Default: `false`
    pub fn binary_fallback(&mut self, binary_fallback: bool) -> &mut Self {
        self.binary_fallback = binary_fallback;
        self
    }

    /// Opens an EPUB file.
    ///
    /// See [`EpubArchive::open`] for the possible errors.
    pub fn open(&self, path: impl AsRef<Path>) -> ArchiveResult<EpubArchive> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| ArchiveError::UnreadableArchive {
            source,
            path: Some(path.to_path_buf()),
        })?;

        zip::load(self, BufReader::new(file), Some(path))
    }

    /// Reads an EPUB from any implementation of [`Read`] + [`Seek`].
    pub fn read<R: Read + Seek>(&self, reader: R) -> ArchiveResult<EpubArchive> {
        zip::load(self, reader, None)
    }

    /// Decodes `bytes` read from the entry at `path` according to its classification.
    fn decode(&self, path: &str, bytes: Vec<u8>) -> ArchiveResult<EntryContent> {
        if !is_text_path(path) {
            return Ok(EntryContent::Binary(bytes));
        }

        match String::from_utf8(bytes) {
            Ok(text) => Ok(EntryContent::Text(text)),
            Err(error) if self.binary_fallback => {
                log::warn!("`{path}` is not valid UTF-8; keeping it as binary: {error}");
                Ok(EntryContent::Binary(error.into_bytes()))
            }
            Err(source) => Err(ArchiveError::InvalidUtf8Entry {
                source,
                entry: path.to_owned(),
            }),
        }
    }
}
