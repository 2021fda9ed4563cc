use colored::*;
use eyre::Result;
use std::path::Path;

use crate::cli::{ConfigAction, OutputFormat};
use crate::config::{Config, SETTING_KEYS, SettingsAccess};

pub fn run(action: ConfigAction, config: &Config) -> Result<()> {
    match action {
        ConfigAction::Show { format } => show(OutputFormat::resolve(format), config),
        ConfigAction::Get { key } => get(&key, config),
        ConfigAction::Set { key, value, admin } => set(&key, &value, admin, config, &config.save_path()),
    }
}

fn show(format: OutputFormat, config: &Config) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(config)?);
        }
        OutputFormat::Yaml => {
            println!("{}", serde_yaml::to_string(config)?);
        }
        OutputFormat::Text => {
            println!("{}", "Signal Notifier Configuration".bold());
            println!();

            for (key, access) in SETTING_KEYS {
                let value = config.get(key).unwrap_or_default();
                let marker = match access {
                    SettingsAccess::Admin => " (admin)".dimmed().to_string(),
                    _ => String::new(),
                };
                println!("  {}: {}{}", key.cyan(), value, marker);
            }
        }
    }

    Ok(())
}

fn get(key: &str, config: &Config) -> Result<()> {
    match config.get(key) {
        Some(v) => println!("{}", v),
        None => {
            eprintln!("{} Unknown config key: {}", "✗".red(), key);
            std::process::exit(1);
        }
    }

    Ok(())
}

fn set(key: &str, value: &str, admin: bool, config: &Config, path: &Path) -> Result<()> {
    let new_config = apply_set(key, value, admin, config)?;

    println!("{} Setting {} = {}", "→".blue(), key.cyan(), value.green());
    new_config.save(path)?;
    println!("  {} Saved to {}", "✓".green(), path.display());

    Ok(())
}

/// Apply one change, honouring the settings access policy
fn apply_set(key: &str, value: &str, admin: bool, config: &Config) -> Result<Config> {
    match Config::access_for(key) {
        None => eyre::bail!("Unknown config key: {}", key),
        Some(SettingsAccess::Never) => eyre::bail!("{} cannot be changed", key),
        Some(SettingsAccess::Admin) if !admin => {
            eyre::bail!("{} is an admin-only setting (pass --admin to change it)", key)
        }
        Some(_) => {}
    }

    let mut new_config = config.clone();
    new_config.set(key, value)?;
    Ok(new_config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_key_requires_flag() {
        let config = Config::default();
        assert!(apply_set("notifier.sender", "+1555", false, &config).is_err());

        let updated = apply_set("notifier.sender", "+1555", true, &config).unwrap();
        assert_eq!(updated.notifier.sender, "+1555");
    }

    #[test]
    fn test_user_key_needs_no_flag() {
        let config = Config::default();
        let updated = apply_set("notifier.templates.done", "{filename} is done", false, &config).unwrap();
        assert_eq!(updated.notifier.templates.done, "{filename} is done");
    }

    #[test]
    fn test_unknown_key() {
        assert!(apply_set("notifier.color", "blue", true, &Config::default()).is_err());
    }

    #[test]
    fn test_set_writes_file() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("signal-notifier.yaml");

        set("notifier.enabled_paused", "false", false, &Config::default(), &path).unwrap();

        let loaded = Config::load_from_file(&path).unwrap();
        assert!(!loaded.notifier.enabled_paused);
    }
}
