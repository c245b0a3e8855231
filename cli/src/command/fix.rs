use clap::{Args, ValueEnum};
use epubfix::EpubArchive;
use epubfix::errors::EpubFixResult;
use epubfix::fix::{FixKind, FixOptions, FixReport};
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct FixCommand {
    /// The EPUB file to fix
    pub infile: PathBuf,

    /// Output path for the fixed EPUB
    #[arg(required_unless_present_any = ["in_place", "dry_run"], conflicts_with = "in_place")]
    pub outfile: Option<PathBuf>,

    /// Language assigned to the book when it declares none
    #[arg(long, value_name = "TAG", default_value = "en")]
    pub language: String,

    /// Disable a fix pass (repeatable)
    #[arg(long, value_enum, value_name = "PASS")]
    pub skip: Vec<Pass>,

    /// Report the fixes that would be made without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Replace the input file with the fixed EPUB
    #[arg(long, short)]
    pub in_place: bool,

    /// Print no fixes; exit with 3 if any fix was needed
    #[arg(long, short)]
    pub quiet: bool,

    /// Keep text files that are not valid UTF-8 as-is instead of failing
    #[arg(long)]
    pub binary_fallback: bool,

    /// Deflate level of the written EPUB (0 stores entries uncompressed)
    #[arg(long, value_name = "LEVEL", default_value_t = 6,
          value_parser = clap::value_parser!(u8).range(0..=9))]
    pub compression: u8,
}

/// A fix pass that can be disabled with `--skip`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Pass {
    /// Links that name the body id of the document they point to
    #[value(name = "bodyid")]
    BodyId,
    /// Missing book language
    Language,
    /// Images without a source
    Img,
    /// Missing XML encoding declarations
    Encoding,
}

impl From<Pass> for FixKind {
    fn from(pass: Pass) -> Self {
        match pass {
            Pass::BodyId => FixKind::BodyIdLink,
            Pass::Language => FixKind::BookLanguage,
            Pass::Img => FixKind::StrayImg,
            Pass::Encoding => FixKind::Encoding,
        }
    }
}

impl FixCommand {
    pub fn fix(&self) -> EpubFixResult<FixReport> {
        let mut archive = EpubArchive::options()
            .binary_fallback(self.binary_fallback)
            .open(&self.infile)?;
        let report = archive.fix_with(self.fix_options());

        for diagnostic in report.diagnostics() {
            eprintln!("warning: {diagnostic}");
        }
        if !self.quiet {
            for fix in report.fixes() {
                println!("{fix}");
            }
        }

        if let Some(destination) = self.destination() {
            archive
                .write()
                .compression(self.compression)
                .save(destination)?;
        }
        Ok(report)
    }

    pub fn fix_options(&self) -> FixOptions {
        self.skip
            .iter()
            .fold(
                FixOptions::builder().default_language(&self.language),
                |builder, pass| builder.skip((*pass).into()),
            )
            .build()
    }

    /// Where the fixed EPUB is written, if anywhere.
    pub fn destination(&self) -> Option<&Path> {
        if self.dry_run {
            None
        } else if self.in_place {
            Some(&self.infile)
        } else {
            self.outfile.as_deref()
        }
    }
}
