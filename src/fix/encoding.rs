use crate::fix::{FixKind, Fixer};
use regex::Regex;
use std::sync::LazyLock;

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="utf-8"?>"#;

/// An XML declaration stating both version and encoding, in that order.
static DECLARED_ENCODING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)^<\?xml\s+version=["'][\d.]+["']\s+encoding=["'][a-zA-Z\d\-.]+["'].*?\?>"#,
    )
    .expect("valid regex")
});

/// Outcome of inspecting the start of a content document.
#[derive(Debug, PartialEq)]
enum Declaration {
    /// Starts with a declaration stating its encoding.
    Present,
    /// A declaration is present but preceded by whitespace.
    Indented,
    Missing,
}

impl Declaration {
    fn of(text: &str) -> Self {
        let trimmed = text.trim_start();

        if !DECLARED_ENCODING.is_match(trimmed) {
            Self::Missing
        } else if trimmed.len() != text.len() {
            Self::Indented
        } else {
            Self::Present
        }
    }
}

impl Fixer<'_> {
    pub(super) fn fix_encoding(&mut self) {
        for (path, text) in self.archive.content_documents_mut() {
            let message = match Declaration::of(text) {
                Declaration::Present => continue,
                Declaration::Indented => {
                    *text = text.trim_start().to_owned();
                    format!("Removed leading whitespace before XML declaration in file {path}")
                }
                Declaration::Missing => {
                    *text = format!("{XML_DECLARATION}\n{}", text.trim_start());
                    format!("Fixed encoding for file {path}")
                }
            };
            self.report.record(FixKind::Encoding, Some(path), message);
        }
    }
}
