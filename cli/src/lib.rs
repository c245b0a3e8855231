use clap::Parser;

pub mod command;
pub mod exit_code;

/// Repair common defects of an EPUB file.
///
/// Each change made is printed on its own line;
/// problems that could not be fixed are printed to stderr.
#[derive(Debug, Parser)]
#[command(name = "fix-epub", version, long_about = None)]
pub struct FixCli {
    #[command(flatten)]
    pub command: command::FixCommand,
}

/// Package a directory as an EPUB.
///
/// Useful to pack an extracted, modified EPUB back into a single file.
#[derive(Debug, Parser)]
#[command(name = "pack-epub", version, long_about = None)]
pub struct PackCli {
    #[command(flatten)]
    pub command: command::PackCommand,
}
