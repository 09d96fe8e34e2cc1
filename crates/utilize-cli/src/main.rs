//! utilize CLI
//!
//! Writes the default resource configuration document.

mod cli;
mod commands;
mod error;

use clap::{CommandFactory, Parser};
use colored::Colorize;

use cli::Cli;
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // A subscriber may already be installed by an embedding process
    let _ = utilize_core::logging::init();
    tracing::debug!(path = %cli.file_path.display(), init = cli.init, "parsed arguments");

    if cli.init {
        commands::run_init(&cli.file_path)
    } else {
        Cli::command().print_help()?;
        Ok(())
    }
}
