use crate::consts;
use crate::fix::{FixKind, Fixer};
use crate::parser::ParserResult;
use crate::parser::xml::{MarkupReader, Spanned, XmlElement};
use quick_xml::events::Event;
use std::ops::Range;

impl Fixer<'_> {
    pub(super) fn fix_stray_images(&mut self) {
        for (path, text) in self.archive.content_documents_mut() {
            let stray = match stray_images(text) {
                Ok(stray) => stray,
                Err(error) => {
                    self.report.markup_error(FixKind::StrayImg, path, error);
                    continue;
                }
            };
            // Untouched documents keep every byte
            if stray.is_empty() {
                continue;
            }

            *text = remove_spans(text, &stray);
            self.report.record(
                FixKind::StrayImg,
                Some(path),
                format!("Removed stray image in {path}"),
            );
        }
    }
}

/// Spans of every `<img>` element lacking a `src` attribute, in document order.
///
/// An `<img>` start tag immediately followed by `</img>` spans both tags.
fn stray_images(text: &str) -> ParserResult<Vec<Range<usize>>> {
    let mut reader = MarkupReader::new(text);
    let mut stray: Vec<Range<usize>> = Vec::new();
    // Span of an `<img>` start tag awaiting a possible `</img>`
    let mut open: Option<Range<usize>> = None;

    while let Some(result) = reader.next() {
        let Spanned { event, span } = result?;
        let closes_img = matches!(
            &event,
            Event::End(el) if el.local_name().as_ref() == consts::bytes::IMG
        );

        if let Some(start) = open.take() {
            if closes_img {
                stray.push(start.start..span.end);
                continue;
            }
            stray.push(start);
        }
        match event {
            Event::Empty(el) if is_stray(&el) => stray.push(span),
            // HTML void element; removed on its own unless closed right away
            Event::Start(el) if is_stray(&el) => open = Some(span),
            _ => {}
        }
    }
    stray.extend(open);
    Ok(stray)
}

fn is_stray(el: &quick_xml::events::BytesStart) -> bool {
    el.is_local_name(consts::bytes::IMG) && !el.has_attribute(consts::SRC)
}

/// Removes the given ordered, non-overlapping spans from `text`.
fn remove_spans(text: &str, spans: &[Range<usize>]) -> String {
    let mut result = String::with_capacity(text.len());
    let mut last = 0;

    for span in spans {
        result.push_str(&text[last..span.start]);
        last = span.end;
    }
    result.push_str(&text[last..]);
    result
}
