use clap::Parser;
use epubfix_cli::FixCli;
use epubfix_cli::exit_code;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = FixCli::parse();

    match cli.command.fix() {
        Ok(report) => exit_code::after_fix(&report, cli.command.quiet),
        Err(error) => exit_code::after_error(&error),
    }
}
