use crate::consts::{self, bytes, mime};
use crate::fix::errors::FixError;
use crate::fix::{FixKind, Fixer};
use crate::parser::ParserResult;
use crate::parser::xml::{self, MarkupReader, Spanned, XmlElement};
use crate::util::uri;
use quick_xml::events::Event;
use std::ops::Range;

pub(super) const DEFAULT_LANGUAGE: &str = "en";
/// Recorded as the original language when a book declares none.
const UNDEFINED: &str = "undefined";

/// Languages accepted by Kindle (KDP), by primary subtag.
///
/// See <https://kdp.amazon.com/en_US/help/topic/G200673300>
#[rustfmt::skip]
const SUPPORTED_LANGUAGES: &[&str] = &[
    // ISO 639-1 (and the few ISO 639-2/3 codes KDP lists alongside them)
    "af", "gsw", "ar", "eu", "nb", "br", "ca", "zh", "kw", "co", "da", "nl", "stq", "en", "fi",
    "fr", "fy", "gl", "de", "gu", "hi", "is", "ga", "it", "ja", "lb", "mr", "ml", "gv", "frr",
    "nn", "pl", "pt", "oc", "rm", "sco", "gd", "es", "sv", "ta", "cy",
    // ISO 639-2
    "afr", "ara", "eus", "baq", "nob", "bre", "cat", "zho", "chi", "cor", "cos", "dan", "nld",
    "dut", "eng", "fin", "fra", "fre", "fry", "glg", "deu", "ger", "guj", "hin", "isl", "ice",
    "gle", "ita", "jpn", "ltz", "mar", "mal", "glv", "nor", "nno", "por", "oci", "roh", "gla",
    "spa", "swe", "tam", "cym", "wel",
];

/// Returns `true` if the primary subtag of `language` is accepted by Kindle.
///
/// `en-US` -> `en`
pub(crate) fn is_supported_language(language: &str) -> bool {
    let primary = language.split('-').next().unwrap_or_default().to_lowercase();
    SUPPORTED_LANGUAGES.contains(&primary.as_str())
}

/// Where the `dc:language` of a package document stands.
#[derive(Debug, PartialEq)]
enum PackageLanguage {
    /// The declared (trimmed, unescaped) language.
    Declared(String),
    /// No `dc:language` exists; a new element is spliced in with the [`Insertion`].
    Missing(Insertion),
}

/// A splice into the package document adding a `dc:language` element.
///
/// `range` of the source is replaced with `prefix + <dc:language> + suffix`.
#[derive(Debug, PartialEq)]
struct Insertion {
    range: Range<usize>,
    prefix: String,
    suffix: String,
}

impl Fixer<'_> {
    pub(super) fn fix_book_language(&mut self) {
        let Some(package_file) = self.locate_package_file() else {
            return;
        };
        let Some(package) = self.archive.text(&package_file) else {
            self.report.diagnose(
                FixKind::BookLanguage,
                FixError::MetadataMissing(format!("Cannot find OPF file `{package_file}`")),
            );
            return;
        };

        let language = match package_language(package) {
            Ok(Some(language)) => language,
            Ok(None) => {
                self.report.diagnose(
                    FixKind::BookLanguage,
                    FixError::MetadataMissing(format!(
                        "Missing `metadata` element in `{package_file}`"
                    )),
                );
                return;
            }
            Err(error) => {
                self.report
                    .markup_error(FixKind::BookLanguage, &package_file, error);
                return;
            }
        };

        let (original, effective) = match &language {
            PackageLanguage::Declared(declared) => (declared.as_str(), declared.as_str()),
            PackageLanguage::Missing(_) => (UNDEFINED, self.options.default_language.as_str()),
        };

        // Previously an interactive prompt; now report-only.
        if !is_supported_language(effective) {
            self.report.diagnose(
                FixKind::BookLanguage,
                FixError::UnsupportedLanguage(effective.to_owned()),
            );
        }

        // A declared language is kept as-is
        let PackageLanguage::Missing(insertion) = &language else {
            return;
        };
        let updated = insertion.apply(package, effective);
        let message = format!("Changed document language from {original} to {effective}.");

        self.archive.set_text(&package_file, updated);
        self.report
            .record(FixKind::BookLanguage, Some(&package_file), message);
    }

    /// The archive path of the package document referenced by `META-INF/container.xml`.
    fn locate_package_file(&mut self) -> Option<String> {
        let Some(container) = self.archive.text(consts::CONTAINER) else {
            self.report.diagnose(
                FixKind::BookLanguage,
                FixError::MetadataMissing(format!("Cannot find {}", consts::CONTAINER)),
            );
            return None;
        };

        match package_file(container) {
            Ok(Some(path)) => Some(path),
            Ok(None) => {
                self.report.diagnose(
                    FixKind::BookLanguage,
                    FixError::MetadataMissing(format!(
                        "Missing `rootfile` element referencing an OPF file in {}",
                        consts::CONTAINER
                    )),
                );
                None
            }
            Err(error) => {
                self.report
                    .markup_error(FixKind::BookLanguage, consts::CONTAINER, error);
                None
            }
        }
    }
}

/// Parses `META-INF/container.xml` and retrieves the package `.opf` file location.
fn package_file(container: &str) -> ParserResult<Option<String>> {
    let mut reader = MarkupReader::new(container);
    // Although rare, multiple package.opf locations could exist.
    // Only accept the first path as it is the default
    let rootfile = reader.find_element(|el| {
        el.is_local_name(bytes::ROOT_FILE)
            && el.get_attribute(consts::MEDIA_TYPE).as_deref() == Some(mime::OEBPS_PACKAGE)
    })?;

    Ok(rootfile.and_then(|(el, _)| {
        el.get_attribute(consts::FULL_PATH)
            .map(|path| uri::strip_root(&path).to_owned())
    }))
}

/// Locates the `dc:language` of a package document.
///
/// Returns [`None`] if neither a `dc:language` nor a `metadata` element exists.
fn package_language(package: &str) -> ParserResult<Option<PackageLanguage>> {
    let mut reader = MarkupReader::new(package);
    let mut language_start = None;

    while let Some(result) = reader.next() {
        let Spanned { event, span } = result?;

        let language = match event {
            Event::Start(el) if el.is_name(bytes::LANGUAGE) => {
                language_start = Some(span.end);
                continue;
            }
            Event::Empty(el) if el.is_name(bytes::LANGUAGE) => {
                PackageLanguage::Declared(String::new())
            }
            Event::End(el) if el.name().as_ref() == bytes::LANGUAGE => match language_start {
                Some(start) => {
                    let text = package[start..span.start].trim();
                    PackageLanguage::Declared(xml::unescape(text).into_owned())
                }
                None => continue,
            },
            Event::End(el) if el.local_name().as_ref() == bytes::METADATA => {
                PackageLanguage::Missing(Insertion::before_end_tag(package, span.start))
            }
            Event::Empty(el) if el.is_local_name(bytes::METADATA) => {
                let name = String::from_utf8_lossy(el.name().as_ref()).into_owned();
                PackageLanguage::Missing(Insertion::expand_empty_tag(package, span, &name))
            }
            _ => continue,
        };
        return Ok(Some(language));
    }
    Ok(None)
}

impl Insertion {
    /// Inserts before the closing `</metadata>` tag starting at `position`.
    ///
    /// If the closing tag is on its own line, the element is placed on a new line
    /// indented like the previous child.
    fn before_end_tag(package: &str, position: usize) -> Self {
        let line_start = package[..position].rfind('\n').map(|index| index + 1);

        match line_start {
            Some(line_start) if package[line_start..position].trim().is_empty() => {
                let indent = &package[line_start..position];
                let newline = if package[..line_start - 1].ends_with('\r') {
                    "\r\n"
                } else {
                    "\n"
                };

                Self {
                    range: line_start..line_start,
                    prefix: child_indent(package, line_start - 1, indent),
                    suffix: String::from(newline),
                }
            }
            _ => Self {
                range: position..position,
                prefix: String::new(),
                suffix: String::new(),
            },
        }
    }

    /// `<metadata .../>` becomes `<metadata ...>` + `<dc:language>` + `</metadata>`.
    fn expand_empty_tag(package: &str, span: Range<usize>, name: &str) -> Self {
        let open = package[span.clone()]
            .trim_end_matches('>')
            .trim_end_matches('/')
            .trim_end();

        Self {
            prefix: format!("{open}>"),
            suffix: format!("</{name}>"),
            range: span,
        }
    }

    fn apply(&self, package: &str, language: &str) -> String {
        let mut updated = String::with_capacity(package.len() + 64);
        updated.push_str(&package[..self.range.start]);
        updated.push_str(&self.prefix);
        updated.push_str(&format!("<{0}>{language}</{0}>", consts::LANGUAGE));
        updated.push_str(&self.suffix);
        updated.push_str(&package[self.range.end..]);
        updated
    }
}

/// The indentation of the line ending at `newline`
/// if it is deeper than `parent_indent`, otherwise `parent_indent` plus two spaces.
fn child_indent(package: &str, newline: usize, parent_indent: &str) -> String {
    let line_start = package[..newline].rfind('\n').map_or(0, |index| index + 1);
    let line = &package[line_start..newline];
    let indent = &line[..line.len() - line.trim_start().len()];

    if indent.len() > parent_indent.len() {
        indent.to_owned()
    } else {
        format!("{parent_indent}  ")
    }
}
