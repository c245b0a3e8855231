use epubfix::EpubArchive;
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;

/// Unzipped EPUB containing one instance of every defect the fix passes repair
pub const FIXABLE_EPUB_DIR: &str = "tests/ebooks/fixable_epub";

pub const CONTAINER_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
  <rootfiles>
    <rootfile full-path="OEBPS/content.opf" media-type="application/oebps-package+xml"/>
  </rootfiles>
</container>"#;

/// A package document with the given elements inside `<metadata>`.
pub fn package_opf(metadata: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<package xmlns="http://www.idpf.org/2007/opf" version="3.0" unique-identifier="uid">
  <metadata xmlns:dc="http://purl.org/dc/elements/1.1/">
    <dc:identifier id="uid">urn:uuid:1</dc:identifier>
    <dc:title>Test</dc:title>{metadata}
  </metadata>
  <manifest/>
  <spine/>
</package>"#
    )
}

/// A content document with the given `<body>` attributes and content.
pub fn xhtml(body_attributes: &str, body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<html xmlns="http://www.w3.org/1999/xhtml">
<head><title>Test</title></head>
<body{body_attributes}>{body}</body>
</html>"#
    )
}

/// Zips `entries` in order, every entry stored.
///
/// Entries ending with `/` are added as directories.
pub fn zip_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);

    for (name, data) in entries {
        if name.ends_with('/') {
            zip.add_directory(*name, options).unwrap();
        } else {
            zip.start_file(*name, options).unwrap();
            zip.write_all(data).unwrap();
        }
    }
    zip.finish().unwrap().into_inner()
}

/// A minimal EPUB with a container and the given text entries.
pub fn epub_with(entries: &[(&str, &str)]) -> EpubArchive {
    let mut all: Vec<(&str, &[u8])> = vec![
        ("mimetype", b"application/epub+zip".as_slice()),
        ("META-INF/container.xml", CONTAINER_XML.as_bytes()),
    ];
    all.extend(entries.iter().map(|(name, text)| (*name, text.as_bytes())));

    EpubArchive::read(Cursor::new(zip_bytes(&all))).unwrap()
}

/// Entry names of a zip archive in central directory order.
pub fn entry_names(bytes: &[u8]) -> Vec<String> {
    let mut zip = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    (0..zip.len())
        .map(|index| zip.by_index(index).unwrap().name().to_owned())
        .collect()
}

/// Packs [`FIXABLE_EPUB_DIR`] in memory and loads it.
pub fn open_fixable_epub() -> EpubArchive {
    let bytes = epubfix::pack::pack_directory_to(FIXABLE_EPUB_DIR, Cursor::new(Vec::new()))
        .unwrap()
        .into_inner();
    EpubArchive::read(Cursor::new(bytes)).unwrap()
}
