use clap::Parser;
use epubfix_cli::PackCli;
use epubfix_cli::exit_code;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = PackCli::parse();

    match cli.command.pack() {
        Ok(()) => ExitCode::from(exit_code::SUCCESS),
        Err(error) => exit_code::after_error(&error),
    }
}
