use crate::epub::util::{entry_names, zip_bytes};
use epubfix::errors::ArchiveError;
use epubfix::{EntryContent, EpubArchive};
use std::io::Cursor;
use zip::CompressionMethod;

const PNG: &[u8] = b"\x89PNG\r\n\x1a\n";

#[test]
fn test_load_entries() {
    let bytes = zip_bytes(&[
        ("mimetype", b"application/epub+zip"),
        ("OEBPS/", b""),
        ("OEBPS/c1.xhtml", b"<html/>"),
        ("OEBPS/images/cover.png", PNG),
        ("OEBPS/fonts/serif.otf", b"OTTO"),
    ]);
    let epub = EpubArchive::read(Cursor::new(bytes)).unwrap();

    // Directory entries are skipped
    let entries: Vec<_> = epub
        .entries()
        .map(|entry| (entry.path(), entry.is_text()))
        .collect();
    assert_eq!(
        vec![
            ("mimetype", true),
            ("OEBPS/c1.xhtml", true),
            ("OEBPS/images/cover.png", false),
            ("OEBPS/fonts/serif.otf", false),
        ],
        entries
    );
    assert_eq!(Some("<html/>"), epub.text("OEBPS/c1.xhtml"));
    assert_eq!(
        &EntryContent::Binary(PNG.to_vec()),
        epub.get("OEBPS/images/cover.png").unwrap().content()
    );
}

#[test]
fn test_open_missing_file() {
    let error = EpubArchive::open("tests/ebooks/missing.epub").unwrap_err();

    assert!(matches!(
        error,
        ArchiveError::UnreadableArchive { path: Some(path), .. } if path.ends_with("missing.epub")
    ));
}

#[test]
fn test_read_invalid_archive() {
    let error = EpubArchive::read(Cursor::new(b"not a zip file".to_vec())).unwrap_err();
    assert!(matches!(error, ArchiveError::UnreadableArchive { path: None, .. }));
}

#[test]
fn test_invalid_utf8_text_entry() {
    let bytes = zip_bytes(&[("OEBPS/c1.xhtml", b"<html>\xFF</html>")]);

    let error = EpubArchive::read(Cursor::new(bytes.clone())).unwrap_err();
    assert!(matches!(
        error,
        ArchiveError::InvalidUtf8Entry { entry, .. } if entry == "OEBPS/c1.xhtml"
    ));

    let epub = EpubArchive::options()
        .binary_fallback(true)
        .read(Cursor::new(bytes))
        .unwrap();
    let entry = epub.get("OEBPS/c1.xhtml").unwrap();
    assert!(!entry.is_text());
    assert_eq!(b"<html>\xFF</html>", entry.bytes());
}

#[test]
fn test_write_order() {
    let bytes = zip_bytes(&[
        ("a.css", b"p {}"),
        ("cover.png", PNG),
        ("mimetype", b"application/epub+zip"),
        ("b.xhtml", b"<html/>"),
    ]);
    let epub = EpubArchive::read(Cursor::new(bytes)).unwrap();
    let written = epub.write().to_vec().unwrap();

    assert_eq!(
        vec!["mimetype", "a.css", "b.xhtml", "cover.png"],
        entry_names(&written)
    );

    let mut zip = zip::ZipArchive::new(Cursor::new(&written)).unwrap();
    assert_eq!(
        CompressionMethod::Stored,
        zip.by_name("mimetype").unwrap().compression()
    );
    assert_eq!(
        CompressionMethod::Deflated,
        zip.by_name("cover.png").unwrap().compression()
    );
}

#[test]
fn test_write_preserves_content() {
    let bytes = zip_bytes(&[
        ("mimetype", b"application/epub+zip"),
        ("OEBPS/c1.xhtml", "<p>caf\u{e9}</p>".as_bytes()),
        ("OEBPS/images/cover.png", PNG),
    ]);
    let epub = EpubArchive::read(Cursor::new(bytes)).unwrap();

    let written = epub.write().compression(9).to_vec().unwrap();
    let reloaded = EpubArchive::read(Cursor::new(written)).unwrap();

    assert_eq!(epub, reloaded);
}

#[test]
fn test_save_over_source() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("book.epub");
    std::fs::write(
        &path,
        zip_bytes(&[
            ("mimetype", b"application/epub+zip"),
            ("c1.xhtml", b"<html><body><img/></body></html>"),
        ]),
    )
    .unwrap();

    let mut epub = EpubArchive::open(&path).unwrap();
    assert!(!epub.fix().is_clean());
    epub.write().save(&path).unwrap();

    let saved = EpubArchive::open(&path).unwrap();
    assert_eq!(epub, saved);
    // No temporary files are left behind
    assert_eq!(1, std::fs::read_dir(dir.path()).unwrap().count());
}

#[test]
fn test_save_into_missing_directory() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("book.epub");

    let error = EpubArchive::default().write().save(&path).unwrap_err();
    assert!(matches!(error, ArchiveError::UnwritableArchive { .. }));
}

#[test]
fn test_load_ignores_declared_size() {
    let mut bytes = zip_bytes(&[("OEBPS/c1.xhtml", b"<html/>")]);
    let declared = 0xFFFF_FFF0u32.to_le_bytes();

    // Overstate the uncompressed size in the local and central headers
    for (signature, offset) in [(b"PK\x03\x04", 22), (b"PK\x01\x02", 24)] {
        let header = bytes
            .windows(4)
            .position(|window| window == signature)
            .unwrap();
        bytes[header + offset..header + offset + 4].copy_from_slice(&declared);
    }

    match EpubArchive::read(Cursor::new(bytes)) {
        Ok(epub) => assert_eq!(Some("<html/>"), epub.text("OEBPS/c1.xhtml")),
        Err(error) => assert!(
            matches!(
                error,
                ArchiveError::CannotRead { .. } | ArchiveError::UnreadableArchive { .. }
            ),
            "{error}"
        ),
    }
}
