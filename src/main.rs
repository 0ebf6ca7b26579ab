mod cli;
mod execute;

use std::process::ExitCode;
use clap::{CommandFactory, FromArgMatches};
use colored::Colorize;
use cotor::{logging, registry};
use crate::cli::CLI;

fn main() -> ExitCode {
    let shortcuts = format!("Registered tool shortcuts: {}", registry::shortcuts().join(", "));
    let matches = CLI::command().after_help(shortcuts).get_matches();
    let cli = match CLI::from_arg_matches(&matches) {
        Ok(cli) => cli,
        Err(e) => e.exit(),
    };

    if let Err(e) = logging::init(cli.verbose) {
        eprintln!("{} {}", "[WARNING]".yellow().bold(), e);
    }

    match execute::execute(cli) {
        Ok(outcome) => ExitCode::from(outcome.exit_code()),
        Err(e) => {
            eprintln!("{} {:#}", "[ERROR]".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}
