use crate::archive;
use crate::consts;
use crate::fix::{FixKind, Fixer};
use crate::parser::ParserResult;
use crate::parser::xml::{MarkupReader, XmlElement};
use crate::util::uri;

/// A reference such as `c1.xhtml#chapter-1` where `chapter-1` is the `id` of the
/// `<body>` of `c1.xhtml`, along with the filename it should be replaced with.
#[derive(Debug, PartialEq)]
struct BodyIdLink {
    link: String,
    file: String,
    /// Percent-encoded `(link, file)`, if encoding changes the filename.
    encoded: Option<(String, String)>,
}

impl BodyIdLink {
    fn new(path: &str, body_id: &str) -> Self {
        let file = uri::basename(path);
        let encoded = uri::encode(file);

        Self {
            link: format!("{file}#{body_id}"),
            file: file.to_owned(),
            encoded: (encoded != file)
                .then(|| (format!("{encoded}#{body_id}"), encoded.into_owned())),
        }
    }

    /// Replaces every literal occurrence of the link and its percent-encoded form,
    /// returning each `(link, file)` pair that was found.
    fn replace_in(&self, text: &mut String) -> Vec<(&str, &str)> {
        let replacements = std::iter::once((self.link.as_str(), self.file.as_str())).chain(
            self.encoded
                .as_ref()
                .map(|(link, file)| (link.as_str(), file.as_str())),
        );
        let mut replaced = Vec::new();

        for (link, file) in replacements {
            if text.contains(link) {
                *text = text.replace(link, file);
                replaced.push((link, file));
            }
        }
        replaced
    }
}

impl Fixer<'_> {
    pub(super) fn fix_body_id_links(&mut self) {
        let links = self.collect_body_id_links();

        for (path, text) in self.archive.text_entries_mut() {
            for link in &links {
                for (target, file) in link.replace_in(text) {
                    self.report.record(
                        FixKind::BodyIdLink,
                        Some(path),
                        format!("Replaced link target {target} with {file} in file {path}."),
                    );
                }
            }
        }
    }

    fn collect_body_id_links(&mut self) -> Vec<BodyIdLink> {
        let mut links = Vec::new();

        for (path, text) in self.archive.text_entries() {
            if !archive::is_content_document(path) {
                continue;
            }
            match body_id(text) {
                Ok(Some(id)) => links.push(BodyIdLink::new(path, &id)),
                Ok(None) => {}
                Err(error) => self.report.markup_error(FixKind::BodyIdLink, path, error),
            }
        }
        links
    }
}

/// The non-empty `id` of the first `<body>` element, exactly as written.
fn body_id(text: &str) -> ParserResult<Option<String>> {
    let body = MarkupReader::new(text).find_element(|el| el.is_local_name(consts::bytes::BODY))?;

    Ok(body
        .and_then(|(el, _)| el.get_attribute_raw(consts::ID).map(|id| id.into_owned()))
        .filter(|id| !id.is_empty()))
}
