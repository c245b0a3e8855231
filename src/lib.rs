//! # epubfix
//! Repairs common authoring defects in EPUB archives and packs extracted
//! EPUB directories back into archives.
//!
//! An archive is loaded entirely into memory, with each entry held as text
//! (markup, metadata and stylesheets) or opaque bytes. A pipeline of
//! [fix passes](fix) then edits the text entries in place:
//! 1. Links that wrongly name the `<body>` id of a document are pointed at the document itself.
//! 2. A missing `dc:language` is added to the package document.
//! 3. `<img>` elements without a `src` are removed.
//! 4. Content documents lacking an XML encoding declaration gain one.
//!
//! Every untouched byte of the archive is written back as-is,
//! with `mimetype` as the first, uncompressed entry.
//!
//! ## Examples
//! Fixing an EPUB file:
//! ```no_run
//! # use epubfix::errors::EpubFixResult;
//! use epubfix::EpubArchive;
//! use epubfix::fix::{FixKind, FixOptions};
//!
//! # fn main() -> EpubFixResult<()> {
//! let mut archive = EpubArchive::open("book.epub")?;
//! let report = archive.fix_with(FixOptions::builder().default_language("de").skip(FixKind::StrayImg));
//!
//! // Changes made, in pass order
//! for fix in report.fixes() {
//!     println!("{fix}");
//! }
//! // Non-fatal problems, such as a language unsupported by Kindle
//! for diagnostic in report.diagnostics() {
//!     eprintln!("{diagnostic}");
//! }
//!
//! if !report.is_clean() {
//!     archive.write().save("book.fixed.epub")?;
//! }
//! # Ok(())
//! # }
//! ```
//! Packing an extracted EPUB directory:
//! ```no_run
//! # use epubfix::errors::EpubFixResult;
//! # fn main() -> EpubFixResult<()> {
//! epubfix::pack_directory("book/", "book.epub")?;
//! # Ok(())
//! # }
//! ```

mod consts;
mod parser;
mod util;

pub mod archive;
pub mod errors;
pub mod fix;
pub mod pack;
pub mod writer;

pub use self::{
    archive::{ArchiveOptions, Entry, EntryContent, EpubArchive},
    fix::{FixOptions, FixReport},
    pack::pack_directory,
    writer::WriteOptions,
};
