use crate::parser::ParserResult;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::borrow::Cow;
use std::ops::Range;

/// A markup event along with the byte range it occupies in the source.
///
/// Text is reported as its own event, so every event spans from the end of the
/// previous one up to the current reader position.
pub(crate) struct Spanned<'a> {
    pub(crate) event: Event<'a>,
    pub(crate) span: Range<usize>,
}

/// Lenient markup reader over XHTML/HTML/XML text.
///
/// Documents are never re-serialized from events; instead, passes splice the
/// source text at event spans, leaving every untouched byte as-is.
pub(crate) struct MarkupReader<'a> {
    reader: Reader<&'a [u8]>,
    position: usize,
}

impl<'a> MarkupReader<'a> {
    pub(crate) fn new(source: &'a str) -> Self {
        let mut reader = Reader::from_str(source);
        let config = reader.config_mut();
        // Content documents are frequently HTML rather than well-formed XHTML
        config.check_end_names = false;
        config.allow_unmatched_ends = true;

        Self {
            reader,
            position: 0,
        }
    }

    /// Iterator-like method to read the next [`Spanned`] event.
    pub(crate) fn next(&mut self) -> Option<ParserResult<Spanned<'a>>> {
        let event = match self.reader.read_event() {
            Ok(Event::Eof) => return None,
            Ok(event) => event,
            Err(error) => return Some(Err(error)),
        };
        let start = self.position;
        self.position = self.reader.buffer_position() as usize;

        Some(Ok(Spanned {
            event,
            span: start..self.position,
        }))
    }

    /// Reads events until the first start (or empty) element satisfying `predicate`.
    pub(crate) fn find_element(
        &mut self,
        mut predicate: impl FnMut(&BytesStart) -> bool,
    ) -> ParserResult<Option<(BytesStart<'a>, Range<usize>)>> {
        while let Some(result) = self.next() {
            let Spanned { event, span } = result?;

            match event {
                Event::Start(el) | Event::Empty(el) if predicate(&el) => {
                    return Ok(Some((el, span)));
                }
                _ => {}
            }
        }
        Ok(None)
    }
}

pub(crate) trait XmlElement {
    fn is_local_name(&self, local_name: impl AsRef<[u8]>) -> bool;

    fn is_name(&self, name: impl AsRef<[u8]>) -> bool;

    fn has_attribute(&self, key: &str) -> bool;

    /// The attribute value exactly as written in the source (still escaped).
    fn get_attribute_raw(&self, key: &str) -> Option<Cow<'_, str>>;

    /// The unescaped attribute value.
    fn get_attribute(&self, key: &str) -> Option<String> {
        self.get_attribute_raw(key).map(|raw| unescape(&raw).into_owned())
    }
}

impl XmlElement for BytesStart<'_> {
    fn is_local_name(&self, local_name: impl AsRef<[u8]>) -> bool {
        self.local_name().as_ref() == local_name.as_ref()
    }

    fn is_name(&self, name: impl AsRef<[u8]>) -> bool {
        self.name().as_ref() == name.as_ref()
    }

    fn has_attribute(&self, key: &str) -> bool {
        self.html_attributes()
            .filter_map(Result::ok)
            .any(|attribute| attribute.key.as_ref() == key.as_bytes())
    }

    fn get_attribute_raw(&self, key: &str) -> Option<Cow<'_, str>> {
        self.html_attributes()
            .filter_map(Result::ok)
            .find(|attribute| attribute.key.as_ref() == key.as_bytes())
            .map(|attribute| match attribute.value {
                Cow::Borrowed(bytes) => String::from_utf8_lossy(bytes),
                Cow::Owned(bytes) => Cow::Owned(String::from_utf8_lossy(&bytes).into_owned()),
            })
    }
}

/// Unescapes XML entities, falling back to the raw text when malformed.
pub(crate) fn unescape(raw: &str) -> Cow<'_, str> {
    quick_xml::escape::unescape(raw).unwrap_or(Cow::Borrowed(raw))
}
