use colored::*;
use eyre::{Context, Result};
use std::path::Path;

use crate::config::Config;
use crate::migrate;

/// Merge legacy settings into the current config and save it where it was loaded from
pub fn run(source: &Path, dry_run: bool, config: &Config) -> Result<()> {
    let imported = migrate::import_file(source, config.clone())?;

    if dry_run {
        let yaml_str = serde_yaml::to_string(&imported).context("Failed to serialize config")?;
        print!("{}", yaml_str);
        return Ok(());
    }

    let target = config.save_path();
    imported.save(&target)?;

    println!("{} Imported settings from {}", "✓".green(), source.display());
    println!("  Saved to {}", target.display());
    println!("  Run {} to verify them", "signal-notifier check".cyan());

    Ok(())
}
