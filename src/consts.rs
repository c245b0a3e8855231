// Paths
pub(crate) const MIMETYPE: &str = "mimetype";
pub(crate) const CONTAINER: &str = "META-INF/container.xml";
pub(crate) const DS_STORE: &str = ".DS_Store";

// Extensions of entries held as text
pub(crate) const TEXT_EXTENSIONS: &[&str] = &[
    ".html", ".xhtml", ".htm", ".xml", ".svg", ".css", ".opf", ".ncx",
];
// Extensions of content documents visited by markup passes
pub(crate) const CONTENT_EXTENSIONS: &[&str] = &["html", "xhtml"];

// Container attributes
pub(crate) const FULL_PATH: &str = "full-path";
pub(crate) const MEDIA_TYPE: &str = "media-type";

// Metadata elements
pub(crate) const LANGUAGE: &str = "dc:language";

// General
pub(crate) const ID: &str = "id";
pub(crate) const SRC: &str = "src";

pub(crate) mod mime {
    pub(crate) const OEBPS_PACKAGE: &str = "application/oebps-package+xml";
}

// constants where calling str.as_bytes() is not possible
pub(crate) mod bytes {
    pub(crate) const ROOT_FILE: &[u8] = b"rootfile";
    pub(crate) const METADATA: &[u8] = b"metadata";
    pub(crate) const LANGUAGE: &[u8] = super::LANGUAGE.as_bytes();
    pub(crate) const BODY: &[u8] = b"body";
    pub(crate) const IMG: &[u8] = b"img";
}
