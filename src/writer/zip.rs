use crate::archive::errors::{ArchiveError, ArchiveResult};
use std::io::{Seek, Write};
use zip::CompressionMethod;
use zip::write::SimpleFileOptions;

pub(crate) trait ZipFileOptionsExt {
    fn zip_compression_level(self, level: u8) -> Self;
}

impl ZipFileOptionsExt for SimpleFileOptions {
    fn zip_compression_level(self, level: u8) -> Self {
        if level == 0 {
            self.compression_method(CompressionMethod::Stored)
        } else {
            self.compression_method(CompressionMethod::Deflated)
                .compression_level(Some(level.min(9) as i64))
        }
    }
}

pub(crate) struct ZipWriter<W: Write + Seek> {
    inner: zip::ZipWriter<W>,
    options: SimpleFileOptions,
}

impl<W: Write + Seek> ZipWriter<W> {
    pub(crate) fn new(writer: W, compression: u8) -> Self {
        Self {
            inner: zip::ZipWriter::new(writer),
            options: SimpleFileOptions::default().zip_compression_level(compression),
        }
    }

    fn write_zip_entry(
        &mut self,
        name: &str,
        data: &[u8],
        options: SimpleFileOptions,
    ) -> ArchiveResult<()> {
        let cannot_write = |source| ArchiveError::CannotWrite {
            source,
            entry: Some(name.to_owned()),
        };

        self.inner
            // Strip leading '/' to avoid absolute paths in the archive.
            .start_file(name.trim_start_matches('/'), options)
            .map_err(from_zip_error)
            .map_err(cannot_write)?;
        self.inner.write_all(data).map_err(cannot_write)
    }

    /// `mimetype` must be the first entry and stored without compression.
    pub(crate) fn write_uncompressed_file(&mut self, name: &str, data: &[u8]) -> ArchiveResult<()> {
        self.write_zip_entry(
            name,
            data,
            SimpleFileOptions::default().compression_method(CompressionMethod::Stored),
        )
    }

    pub(crate) fn write_file(&mut self, name: &str, data: &[u8]) -> ArchiveResult<()> {
        self.write_zip_entry(name, data, self.options)
    }

    pub(crate) fn finish(self) -> ArchiveResult<W> {
        self.inner
            .finish()
            .map_err(|error| ArchiveError::CannotWrite {
                source: from_zip_error(error),
                entry: None,
            })
    }
}

fn from_zip_error(error: zip::result::ZipError) -> std::io::Error {
    match error {
        zip::result::ZipError::Io(error) => error,
        error => std::io::Error::other(error),
    }
}
