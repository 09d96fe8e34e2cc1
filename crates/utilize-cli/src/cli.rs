//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::Parser;

/// Manage the configuration read by the utilize resource registry
#[derive(Parser, Debug)]
#[command(name = "utilize")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file to write
    #[arg(default_value = "config.ini")]
    pub file_path: PathBuf,

    /// Write the default configuration to FILE_PATH, replacing any existing file
    #[arg(short, long)]
    pub init: bool,
}
