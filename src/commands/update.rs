use colored::*;
use eyre::Result;

use crate::cli::OutputFormat;
use crate::update::UpdateInfo;

pub fn run(format: OutputFormat) -> Result<()> {
    let info = UpdateInfo::current();

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&info)?),
        OutputFormat::Yaml => println!("{}", serde_yaml::to_string(&info)?),
        OutputFormat::Text => {
            println!("{} {}", info.display_name.bold(), info.display_version);
            println!("  check:   {} ({}/{} @ {})", info.check_type, info.user, info.repo, info.branch);
            println!("  archive: {}", info.pip.dimmed());
        }
    }

    Ok(())
}
