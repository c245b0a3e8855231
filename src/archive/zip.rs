use crate::archive::errors::{ArchiveError, ArchiveResult};
use crate::archive::{ArchiveOptions, EpubArchive};
use std::io;
use std::io::{Read, Seek};
use std::path::Path;
use zip::ZipArchive as Zip;

/// Reads every entry of the zip container into memory.
///
/// `reader` (and optional `path` for a more descriptive error message).
pub(super) fn load<R: Read + Seek>(
    options: &ArchiveOptions,
    reader: R,
    path: Option<&Path>,
) -> ArchiveResult<EpubArchive> {
    let mut zip = Zip::new(reader).map_err(|error| ArchiveError::UnreadableArchive {
        source: io::Error::from(error),
        path: path.map(Path::to_path_buf),
    })?;
    let mut archive = EpubArchive::default();

    for index in 0..zip.len() {
        let mut file = zip
            .by_index(index)
            .map_err(|error| ArchiveError::CannotRead {
                entry: zip_entry_name(index),
                source: io::Error::from(error),
            })?;

        // Directories are implied by entry names and never represented
        if file.is_dir() {
            continue;
        }

        let name = file.name().to_owned();
        let mut buf = Vec::new();
        file.read_to_end(&mut buf)
            .map_err(|source| ArchiveError::CannotRead {
                source,
                entry: name.clone(),
            })?;

        let content = options.decode(&name, buf)?;
        archive.insert(name, content);
    }

    log::debug!("loaded {} entries from {:?}", archive.len(), path);
    Ok(archive)
}

fn zip_entry_name(index: usize) -> String {
    format!("#{index}")
}
