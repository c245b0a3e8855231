//! Non-fatal problems encountered by fix passes.

/// Possible problems reported while running a fix pass.
///
/// None of these abort the pipeline:
/// - [`MetadataMissing`](FixError::MetadataMissing) ends the current pass.
/// - [`MarkupParse`](FixError::MarkupParse) skips one file within the current pass.
/// - [`UnsupportedLanguage`](FixError::UnsupportedLanguage) is only reported.
#[non_exhaustive]
#[derive(thiserror::Error, Debug)]
pub enum FixError {
    /// A required metadata document (`META-INF/container.xml` or the package
    /// `.opf` file), or a required element within it, is missing.
    #[error("[MetadataMissing]: {0}")]
    MetadataMissing(String),

    /// A document could not be parsed as markup.
    #[error("[MarkupParse - `{file}`]: {source}")]
    MarkupParse {
        /// The root cause of the error.
        source: quick_xml::Error,
        /// The archive entry responsible for triggering the error.
        file: String,
    },

    /// The book language is not accepted by the target distribution platform.
    ///
    /// Conversion of the book may fail on the platform.
    #[error("[UnsupportedLanguage]: Language `{0}` is not supported by Kindle")]
    UnsupportedLanguage(String),
}
