use clap::Args;
use epubfix::errors::EpubFixResult;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct PackCommand {
    /// Path of the extracted EPUB directory
    pub indir: PathBuf,

    /// Output path for the EPUB file
    pub outfile: PathBuf,
}

impl PackCommand {
    pub fn pack(&self) -> EpubFixResult<()> {
        epubfix::pack_directory(&self.indir, &self.outfile)?;
        Ok(())
    }
}
