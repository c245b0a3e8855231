//! The fix pipeline: four ordered, idempotent passes over the text entries of an
//! [`EpubArchive`].
//!
//! | Order | Pass                                 | Repairs                                            |
//! |-------|--------------------------------------|----------------------------------------------------|
//! | 1     | [`BodyIdLink`](FixKind::BodyIdLink)     | Links duplicating a filename within the fragment   |
//! | 2     | [`BookLanguage`](FixKind::BookLanguage) | Missing `dc:language` metadata                     |
//! | 3     | [`StrayImg`](FixKind::StrayImg)         | `<img>` elements without a `src`                   |
//! | 4     | [`Encoding`](FixKind::Encoding)         | Missing XML encoding declarations                  |
//!
//! Each pass sees the output of the passes before it.

mod body_id;
mod encoding;
pub mod errors;
mod language;
mod stray_img;

use crate::archive::EpubArchive;
use crate::fix::errors::FixError;
use std::fmt::{Display, Formatter};

/// A single fix pass.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FixKind {
    /// Rewrites `file.xhtml#bodyId` references to `file.xhtml`,
    /// where `bodyId` is the `id` of the `<body>` of `file.xhtml`.
    BodyIdLink,
    /// Ensures the package document declares a `dc:language`
    /// and reports languages unsupported by Kindle.
    BookLanguage,
    /// Removes `<img>` elements lacking a `src` attribute.
    StrayImg,
    /// Prepends `<?xml version="1.0" encoding="utf-8"?>` when no encoding is declared.
    Encoding,
}

impl FixKind {
    /// Every pass in pipeline order.
    pub const ALL: [FixKind; 4] = [
        FixKind::BodyIdLink,
        FixKind::BookLanguage,
        FixKind::StrayImg,
        FixKind::Encoding,
    ];

    /// Short, stable name of the pass (e.g., `bodyid`).
    pub fn name(&self) -> &'static str {
        match self {
            FixKind::BodyIdLink => "bodyid",
            FixKind::BookLanguage => "language",
            FixKind::StrayImg => "img",
            FixKind::Encoding => "encoding",
        }
    }
}

impl Display for FixKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A human-readable record of one change made by a pass.
#[derive(Clone, Debug, PartialEq)]
pub struct Fix {
    kind: FixKind,
    file: Option<String>,
    message: String,
}

impl Fix {
    /// The pass that made the change.
    pub fn kind(&self) -> FixKind {
        self.kind
    }

    /// The archive entry that was changed, if the change concerns a single file.
    pub fn file(&self) -> Option<&str> {
        self.file.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for Fix {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// A non-fatal problem reported by a pass.
#[derive(Debug)]
pub struct Diagnostic {
    kind: FixKind,
    error: FixError,
}

impl Diagnostic {
    /// The pass that reported the problem.
    pub fn kind(&self) -> FixKind {
        self.kind
    }

    pub fn error(&self) -> &FixError {
        &self.error
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind, self.error)
    }
}

/// The outcome of running the fix pipeline.
///
/// [`Fix`] records are ordered by the passes that produced them and are never
/// deduplicated; they exist for reporting only.
#[derive(Debug, Default)]
pub struct FixReport {
    fixes: Vec<Fix>,
    diagnostics: Vec<Diagnostic>,
}

impl FixReport {
    /// Every change made, in the order passes made them.
    pub fn fixes(&self) -> &[Fix] {
        &self.fixes
    }

    /// Every non-fatal problem, in the order passes reported them.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Returns `true` if no pass changed anything.
    pub fn is_clean(&self) -> bool {
        self.fixes.is_empty()
    }

    /// Changes made by a specific pass.
    pub fn fixes_of(&self, kind: FixKind) -> impl Iterator<Item = &Fix> {
        self.fixes.iter().filter(move |fix| fix.kind == kind)
    }

    pub(crate) fn record(&mut self, kind: FixKind, file: Option<&str>, message: String) {
        log::debug!("{kind}: {message}");
        self.fixes.push(Fix {
            kind,
            file: file.map(str::to_owned),
            message,
        });
    }

    pub(crate) fn diagnose(&mut self, kind: FixKind, error: FixError) {
        let diagnostic = Diagnostic { kind, error };
        log::warn!("{diagnostic}");
        self.diagnostics.push(diagnostic);
    }

    pub(crate) fn markup_error(&mut self, kind: FixKind, file: &str, source: quick_xml::Error) {
        self.diagnose(
            kind,
            FixError::MarkupParse {
                source,
                file: file.to_owned(),
            },
        );
    }
}

/// Settings to configure the fix pipeline.
///
/// # Examples
/// ```
/// # use epubfix::fix::{FixKind, FixOptions};
/// let options = FixOptions::builder()
///     .default_language("fr")
///     .skip(FixKind::StrayImg)
///     .build();
///
/// assert_eq!("fr", options.default_language);
/// assert!(!options.is_enabled(FixKind::StrayImg));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct FixOptions {
    /// The language assigned to a book when its package document declares none.
    ///
    /// Default: `en`
    pub default_language: String,
    /// Passes to run. Passes always run in pipeline order
    /// (see [`FixKind::ALL`]) regardless of the order given here.
    ///
    /// Default: All passes
    pub passes: Vec<FixKind>,
}

impl FixOptions {
    /// Returns a builder to create a [`FixOptions`] instance.
    pub fn builder() -> FixOptionsBuilder {
        FixOptionsBuilder(FixOptions::default())
    }

    pub fn is_enabled(&self, kind: FixKind) -> bool {
        self.passes.contains(&kind)
    }
}

impl Default for FixOptions {
    fn default() -> Self {
        Self {
            default_language: String::from(language::DEFAULT_LANGUAGE),
            passes: FixKind::ALL.to_vec(),
        }
    }
}

impl From<FixOptionsBuilder> for FixOptions {
    fn from(builder: FixOptionsBuilder) -> Self {
        builder.build()
    }
}

/// Builder to construct a [`FixOptions`] instance.
#[derive(Clone, Debug)]
pub struct FixOptionsBuilder(FixOptions);

impl FixOptionsBuilder {
    /// Turn this builder into a [`FixOptions`] instance.
    pub fn build(self) -> FixOptions {
        self.0
    }

    /// See [`FixOptions::default_language`].
    pub fn default_language(mut self, language: impl Into<String>) -> Self {
        self.0.default_language = language.into();
        self
    }

    /// Disables a pass. See [`FixOptions::passes`].
    pub fn skip(mut self, kind: FixKind) -> Self {
        self.0.passes.retain(|pass| *pass != kind);
        self
    }

    /// Runs only the given passes. See [`FixOptions::passes`].
    pub fn only(mut self, passes: impl IntoIterator<Item = FixKind>) -> Self {
        self.0.passes = passes.into_iter().collect();
        self
    }
}

impl EpubArchive {
    /// Runs every fix pass with default [`FixOptions`].
    ///
    /// Running the pipeline again on its own output yields a clean report.
    pub fn fix(&mut self) -> FixReport {
        self.fix_with(FixOptions::default())
    }

    /// Runs the fix pipeline with the specified [`FixOptions`].
    pub fn fix_with(&mut self, options: impl Into<FixOptions>) -> FixReport {
        let options = options.into();
        Fixer::new(self, &options).run()
    }
}

/// Shared state of a single pipeline run.
pub(crate) struct Fixer<'a> {
    archive: &'a mut EpubArchive,
    options: &'a FixOptions,
    report: FixReport,
}

impl<'a> Fixer<'a> {
    fn new(archive: &'a mut EpubArchive, options: &'a FixOptions) -> Self {
        Self {
            archive,
            options,
            report: FixReport::default(),
        }
    }

    fn run(mut self) -> FixReport {
        for kind in FixKind::ALL {
            if !self.options.is_enabled(kind) {
                log::debug!("skipping pass `{kind}`");
                continue;
            }
            let before = self.report.fixes.len();

            match kind {
                FixKind::BodyIdLink => self.fix_body_id_links(),
                FixKind::BookLanguage => self.fix_book_language(),
                FixKind::StrayImg => self.fix_stray_images(),
                FixKind::Encoding => self.fix_encoding(),
            }
            log::debug!(
                "pass `{kind}` made {} fixes",
                self.report.fixes.len() - before
            );
        }
        self.report
    }
}
