//! Import of legacy plugin settings
//!
//! The original host plugin stored its settings in the host's `config.yaml`
//! under `plugins.signalnotifier`, with flat keys and nested `body` templates.
//! This merges that block (or a file holding just the block) into a
//! current-version [`Config`]. Settings the legacy plugin never had, such as
//! `log_level` and `verify_sender`, keep their current values.

use eyre::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::config::Config;

/// Settings block as the legacy plugin wrote it
#[derive(Debug, Default, Deserialize)]
struct LegacySettings {
    path: Option<String>,
    sender: Option<String>,
    recipient: Option<String>,
    /// Catch-all switch superseded by the per-event flags
    enabled: Option<bool>,
    enabled_done: Option<bool>,
    enabled_pause: Option<bool>,
    message_format: Option<LegacyTemplate>,
    paused_message_format: Option<LegacyTemplate>,
}

#[derive(Debug, Default, Deserialize)]
struct LegacyTemplate {
    body: Option<String>,
}

/// Read a legacy settings file and merge it into `base`
pub fn import_file(path: &Path, base: Config) -> Result<Config> {
    let content = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    import_str(&content, base).with_context(|| format!("Failed to import settings from {}", path.display()))
}

/// Merge legacy settings YAML into `base`
pub fn import_str(content: &str, base: Config) -> Result<Config> {
    let doc: serde_yaml::Value = serde_yaml::from_str(content).context("Failed to parse YAML")?;

    let nested = doc
        .get("plugins")
        .and_then(|plugins| plugins.get("signalnotifier"))
        .cloned();
    let block = nested.unwrap_or(doc);

    if block.is_null() {
        eyre::bail!("No signalnotifier settings found");
    }

    let legacy: LegacySettings = serde_yaml::from_value(block).context("Unexpected settings layout")?;
    Ok(merge(legacy, base))
}

fn merge(legacy: LegacySettings, mut config: Config) -> Config {
    let n = &mut config.notifier;
    if let Some(path) = legacy.path {
        n.executable_path = path.into();
    }
    if let Some(sender) = legacy.sender {
        n.sender = sender;
    }
    if let Some(recipient) = legacy.recipient {
        n.recipient = recipient;
    }
    if let Some(enabled) = legacy.enabled_done {
        n.enabled_done = enabled;
    }
    if let Some(enabled) = legacy.enabled_pause {
        n.enabled_paused = enabled;
    }
    if let Some(body) = legacy.message_format.and_then(|t| t.body) {
        n.templates.done = body;
    }
    if let Some(body) = legacy.paused_message_format.and_then(|t| t.body) {
        n.templates.paused = body;
    }

    if legacy.enabled.is_some() {
        log::info!("Ignoring legacy 'enabled' setting; per-event switches are used instead");
    }

    config
}
