use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use std::borrow::Cow;

/// Characters that must be percent-encoded within the path of an href.
const HREF_PATH: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// The last `/`-separated segment of an archive path.
pub(crate) fn basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// The text after the last `.` of an archive path, without the dot.
///
/// `OEBPS/c1.xhtml` -> `xhtml`
pub(crate) fn extension(path: &str) -> Option<&str> {
    path.rsplit_once('.').map(|(_, extension)| extension)
}

/// The suffix of the final path segment, including the dot.
///
/// A leading dot (`.DS_Store`) does not start a suffix.
pub(crate) fn suffix(path: &str) -> Option<&str> {
    let name = basename(path);
    match name.rfind('.') {
        Some(index) if index > 0 => Some(&name[index..]),
        _ => None,
    }
}

pub(crate) fn encode(path: &str) -> Cow<'_, str> {
    utf8_percent_encode(path, HREF_PATH).into()
}

/// Container paths (`full-path`) may carry a root prefix, archive entry names never do.
///
/// `/OEBPS/package.opf` -> `OEBPS/package.opf`
pub(crate) fn strip_root(path: &str) -> &str {
    path.strip_prefix('/').unwrap_or(path)
}
