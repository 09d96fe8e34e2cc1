//! Init command implementation
//!
//! Writes the default configuration document.

use std::path::Path;

use colored::Colorize;
use utilize_config::{ConfigScaffolder, ConfigStore, DEFAULT_SECTIONS};

use crate::error::{CliError, Result};

/// Run the init command
pub fn run_init(path: &Path) -> Result<()> {
    if path.is_dir() {
        return Err(CliError::user(format!(
            "{} is a directory, expected a file path",
            path.display()
        )));
    }

    println!(
        "{} Writing default configuration to {}...",
        "=>".blue().bold(),
        path.display().to_string().cyan()
    );

    ConfigScaffolder::write_default_config(path)?;

    // Re-read so a broken document never goes unnoticed
    let store = ConfigStore::from_path(path)?;
    tracing::debug!(sections = store.section_names().len(), "verified written config");

    println!(
        "{} Wrote {} sections",
        "OK".green().bold(),
        DEFAULT_SECTIONS.len()
    );
    Ok(())
}
