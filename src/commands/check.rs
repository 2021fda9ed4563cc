//! Diagnose notifier setup issues

use colored::*;
use eyre::Result;

use super::preview;
use crate::config::{Config, SettingsSource};
use crate::hook::PrintEvent;
use crate::message::HostIdentity;
use crate::runner::ProcessRunner;
use crate::validate;

const SAMPLE_FILE: &str = "example.gcode";
const SAMPLE_SECONDS: u64 = 3723;

pub fn run(verify_sender: bool, config: &Config) -> Result<()> {
    let mut settings = config.notifier_settings();
    settings.verify_sender |= verify_sender;

    println!("{}", "Signal Notifier Check".bold());
    println!("{}", "═".repeat(50));
    println!();

    let mut issues = 0;

    println!("{}", "Settings:".bold());

    let executable = match validate::resolve_executable(&settings.executable_path) {
        Ok(path) => {
            println!("  {} signal-cli: {}", "✓".green(), path.display());
            Some(path)
        }
        Err(e) => {
            println!("  {} {}", "✗".red(), e);
            issues += 1;
            None
        }
    };

    if settings.sender.trim().is_empty() {
        println!("  {} Sender is empty", "✗".red());
        println!("    Run {} to set it", "signal-notifier config set notifier.sender <number> --admin".cyan());
        issues += 1;
    } else {
        println!("  {} Sender: {}", "✓".green(), settings.sender);
    }

    if settings.recipient.trim().is_empty() {
        println!("  {} Recipient is empty", "✗".red());
        println!(
            "    Run {} to set it",
            "signal-notifier config set notifier.recipient <number> --admin".cyan()
        );
        issues += 1;
    } else {
        println!("  {} Recipient: {}", "✓".green(), settings.recipient);
    }

    if settings.verify_sender {
        match executable.as_deref() {
            Some(path) if !settings.sender.trim().is_empty() => {
                match validate::verify_sender(path, &settings.sender, &ProcessRunner) {
                    Ok(()) => println!("  {} Sender is registered", "✓".green()),
                    Err(e) => {
                        println!("  {} {}", "✗".red(), e);
                        issues += 1;
                    }
                }
            }
            _ => println!("  {} Sender registration not checked", "⚠".yellow()),
        }
    }

    println!();

    println!("{}", "Notifications:".bold());
    let identity = HostIdentity::detect();
    let events = [
        (PrintEvent::PrintDone, settings.enabled_done, &settings.templates.done),
        (PrintEvent::PrintPaused, settings.enabled_paused, &settings.templates.paused),
    ];
    for (event, enabled, template) in events {
        let state = if enabled { "enabled".green() } else { "disabled".yellow() };
        println!("  {}: {}", event, state);

        match preview::render(event, template, SAMPLE_FILE, SAMPLE_SECONDS, &identity) {
            Ok(text) => println!("    {} {}", "✓".green(), text.dimmed()),
            Err(e) => {
                println!("    {} {}", "✗".red(), e);
                if enabled {
                    issues += 1;
                }
            }
        }
    }

    println!();

    // Summary
    println!("{}", "═".repeat(50));
    if issues == 0 {
        println!("{} All checks passed!", "✓".green().bold());
        Ok(())
    } else {
        println!("{} {} issue(s) found", "⚠".yellow().bold(), issues);
        eyre::bail!("Signal notifier is not ready ({} issue(s))", issues)
    }
}
