use crate::epub::util::{FIXABLE_EPUB_DIR, entry_names};
use epubfix::EpubArchive;
use epubfix::errors::ArchiveError;
use epubfix::pack::pack_directory_to;
use std::fs;
use std::io::Cursor;
use std::path::Path;

fn pack_to_vec(dir: impl AsRef<Path>) -> Vec<u8> {
    pack_directory_to(dir, Cursor::new(Vec::new()))
        .unwrap()
        .into_inner()
}

#[test]
fn test_pack_fixable_epub() {
    let bytes = pack_to_vec(FIXABLE_EPUB_DIR);

    assert_eq!(
        vec![
            "mimetype",
            "META-INF/container.xml",
            "OEBPS/c1.xhtml",
            "OEBPS/c2.xhtml",
            "OEBPS/content.opf",
            "OEBPS/images/cover.png",
            "OEBPS/nav.xhtml",
            "OEBPS/style.css",
        ],
        entry_names(&bytes)
    );

    let mut zip = zip::ZipArchive::new(Cursor::new(&bytes)).unwrap();
    assert_eq!(
        zip::CompressionMethod::Stored,
        zip.by_name("mimetype").unwrap().compression()
    );
}

#[test]
fn test_pack_round_trip() {
    let dir = Path::new(FIXABLE_EPUB_DIR);
    let epub = EpubArchive::read(Cursor::new(pack_to_vec(dir))).unwrap();

    let mut expected: Vec<String> = walkdir::WalkDir::new(dir)
        .into_iter()
        .map(Result::unwrap)
        .filter(|entry| entry.file_type().is_file() && entry.file_name() != ".DS_Store")
        .map(|entry| {
            let relative = entry.path().strip_prefix(dir).unwrap();
            relative.to_str().unwrap().replace('\\', "/")
        })
        .collect();
    let mut actual: Vec<String> = epub.entries().map(|entry| entry.path().to_owned()).collect();
    expected.sort();
    actual.sort();
    assert_eq!(expected, actual);

    for entry in epub.entries() {
        assert_eq!(fs::read(dir.join(entry.path())).unwrap(), entry.bytes());
    }
}

#[test]
fn test_pack_nested_mimetype() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("OEBPS/.hidden")).unwrap();
    fs::write(dir.path().join("OEBPS/text.xhtml"), "<html/>").unwrap();
    fs::write(dir.path().join("OEBPS/mimetype"), "nested").unwrap();
    fs::write(dir.path().join("OEBPS/.hidden/.DS_Store"), [0u8; 4]).unwrap();
    fs::write(dir.path().join("mimetype"), "application/epub+zip").unwrap();

    assert_eq!(
        vec!["mimetype", "OEBPS/mimetype", "OEBPS/text.xhtml"],
        entry_names(&pack_to_vec(dir.path()))
    );
}

#[test]
fn test_pack_without_mimetype() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("b.xhtml"), "<html/>").unwrap();
    fs::write(dir.path().join("a.css"), "").unwrap();

    assert_eq!(vec!["a.css", "b.xhtml"], entry_names(&pack_to_vec(dir.path())));
}

#[test]
fn test_pack_directory_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("packed.epub");

    epubfix::pack_directory(FIXABLE_EPUB_DIR, &out).unwrap();

    let epub = EpubArchive::open(&out).unwrap();
    assert_eq!(Some("application/epub+zip"), epub.text("mimetype"));
}

#[test]
fn test_pack_not_a_directory() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("packed.epub");

    let error = epubfix::pack_directory(Path::new(FIXABLE_EPUB_DIR).join("mimetype"), &out)
        .unwrap_err();

    assert!(matches!(error, ArchiveError::UnreadableArchive { .. }));
    assert!(!out.exists());
}
