use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Settings schema version written into new config files
pub const SETTINGS_VERSION: u32 = 1;

/// Main signal-notifier configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub version: u32,
    pub log_level: LogLevel,
    pub notifier: NotifierSettings,
    /// File the config was read from
    #[serde(skip)]
    pub source: Option<PathBuf>,
    /// Files in the lookup chain that existed but could not be loaded
    #[serde(skip)]
    pub load_problems: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
    Off,
}

impl LogLevel {
    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Off => "off",
        }
    }

    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Trace => log::LevelFilter::Trace,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Off => log::LevelFilter::Off,
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            "off" => Ok(LogLevel::Off),
            _ => eyre::bail!("Invalid log level: {}", s),
        }
    }
}

/// Everything the notifier needs to send a message
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct NotifierSettings {
    /// Location of the signal-cli executable (may contain ~ or $VARS)
    pub executable_path: PathBuf,
    /// Account used as the `-u` argument
    pub sender: String,
    pub recipient: String,
    pub enabled_done: bool,
    pub enabled_paused: bool,
    /// Ask signal-cli whether the sender is registered before every send
    pub verify_sender: bool,
    pub templates: MessageTemplates,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct MessageTemplates {
    pub done: String,
    pub paused: String,
}

pub const DEFAULT_DONE_TEMPLATE: &str = "OctoPrint@{host}: {filename}: Job complete after {elapsed_time}.";
pub const DEFAULT_PAUSED_TEMPLATE: &str = "OctoPrint@{host}: {filename}: Job paused!";

#[cfg(windows)]
const DEFAULT_EXECUTABLE: &str = r"C:\Program Files\signal-cli\bin\signal-cli.bat";
#[cfg(not(windows))]
const DEFAULT_EXECUTABLE: &str = "/usr/local/bin/signal-cli";

impl Default for Config {
    fn default() -> Self {
        Self {
            version: SETTINGS_VERSION,
            log_level: LogLevel::default(),
            notifier: NotifierSettings::default(),
            source: None,
            load_problems: Vec::new(),
        }
    }
}

impl Default for NotifierSettings {
    fn default() -> Self {
        Self {
            executable_path: PathBuf::from(DEFAULT_EXECUTABLE),
            sender: String::new(),
            recipient: String::new(),
            enabled_done: true,
            enabled_paused: true,
            verify_sender: false,
            templates: MessageTemplates::default(),
        }
    }
}

impl Default for MessageTemplates {
    fn default() -> Self {
        Self {
            done: DEFAULT_DONE_TEMPLATE.to_string(),
            paused: DEFAULT_PAUSED_TEMPLATE.to_string(),
        }
    }
}

/// Who may change a setting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingsAccess {
    Admin,
    User,
    #[allow(dead_code)] // No key is locked today
    Never,
}

/// Settable keys and their access level
pub const SETTING_KEYS: &[(&str, SettingsAccess)] = &[
    ("notifier.executable_path", SettingsAccess::Admin),
    ("notifier.sender", SettingsAccess::Admin),
    ("notifier.recipient", SettingsAccess::Admin),
    ("notifier.verify_sender", SettingsAccess::Admin),
    ("notifier.enabled_done", SettingsAccess::User),
    ("notifier.enabled_paused", SettingsAccess::User),
    ("notifier.templates.done", SettingsAccess::User),
    ("notifier.templates.paused", SettingsAccess::User),
    ("log_level", SettingsAccess::User),
];

/// Source of notifier settings, consulted once per event
pub trait SettingsSource {
    fn notifier_settings(&self) -> NotifierSettings;
}

impl SettingsSource for Config {
    fn notifier_settings(&self) -> NotifierSettings {
        self.notifier.clone()
    }
}

impl<S: SettingsSource + ?Sized> SettingsSource for &S {
    fn notifier_settings(&self) -> NotifierSettings {
        (**self).notifier_settings()
    }
}

impl SettingsSource for NotifierSettings {
    fn notifier_settings(&self) -> NotifierSettings {
        self.clone()
    }
}

impl Config {
    /// Load configuration with fallback chain
    ///
    /// An explicit `--config` path must load. Files further down the chain
    /// that exist but fail to load are skipped and recorded in
    /// `load_problems`, since logging is not set up yet at this point.
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        let mut problems = Vec::new();
        for path in Self::candidate_paths() {
            if !path.exists() {
                continue;
            }
            match Self::load_from_file(&path) {
                Ok(mut config) => {
                    config.load_problems = problems;
                    return Ok(config);
                }
                Err(e) => problems.push(format!("Failed to load config from {}: {:#}", path.display(), e)),
            }
        }

        Ok(Self {
            load_problems: problems,
            ..Self::default()
        })
    }

    /// Lookup chain, first existing file wins
    fn candidate_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        if let Ok(env_path) = std::env::var("SIGNAL_NOTIFIER_CONFIG") {
            paths.push(PathBuf::from(env_path));
        }
        if let Ok(dir) = std::env::var("SIGNAL_NOTIFIER_DIR") {
            paths.push(PathBuf::from(dir).join("signal-notifier.yaml"));
        }
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("signal-notifier").join("signal-notifier.yaml"));
        }
        // ./signal-notifier.yaml (for development)
        paths.push(PathBuf::from("signal-notifier.yaml"));

        paths
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let mut config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;
        config.source = Some(path.as_ref().to_path_buf());

        Ok(config)
    }

    /// Write the configuration as YAML, creating parent directories
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {}", parent.display()))?;
        }

        let yaml_str = serde_yaml::to_string(self).context("Failed to serialize config")?;
        fs::write(path, yaml_str).context("Failed to write config file")?;

        log::info!("Saved config to: {}", path.display());
        Ok(())
    }

    /// Directory that holds the config file and logs
    pub fn notifier_dir() -> PathBuf {
        std::env::var("SIGNAL_NOTIFIER_DIR").map(PathBuf::from).unwrap_or_else(|_| {
            dirs::config_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("signal-notifier")
        })
    }

    /// Default location for a new config file
    pub fn default_path() -> PathBuf {
        Self::notifier_dir().join("signal-notifier.yaml")
    }

    /// Where `config set` and `import` write: the file this config came from,
    /// or the default location when it came from nowhere
    pub fn save_path(&self) -> PathBuf {
        self.source.clone().unwrap_or_else(Self::default_path)
    }

    /// Expand a path that may contain ~ or env vars
    pub fn expand_path(path: &Path) -> PathBuf {
        let path_str = path.to_string_lossy();
        let expanded = shellexpand::full(&path_str).unwrap_or_else(|_| path_str.clone());
        PathBuf::from(expanded.as_ref())
    }

    pub fn access_for(key: &str) -> Option<SettingsAccess> {
        SETTING_KEYS
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, access)| *access)
    }

    /// Read a setting by its dotted key
    pub fn get(&self, key: &str) -> Option<String> {
        let n = &self.notifier;
        let value = match key {
            "notifier.executable_path" => n.executable_path.display().to_string(),
            "notifier.sender" => n.sender.clone(),
            "notifier.recipient" => n.recipient.clone(),
            "notifier.verify_sender" => n.verify_sender.to_string(),
            "notifier.enabled_done" => n.enabled_done.to_string(),
            "notifier.enabled_paused" => n.enabled_paused.to_string(),
            "notifier.templates.done" => n.templates.done.clone(),
            "notifier.templates.paused" => n.templates.paused.clone(),
            "log_level" | "log-level" => self.log_level.as_filter().to_string(),
            _ => return None,
        };
        Some(value)
    }

    /// Update a setting by its dotted key
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let n = &mut self.notifier;
        match key {
            "notifier.executable_path" => n.executable_path = value.into(),
            "notifier.sender" => n.sender = value.to_string(),
            "notifier.recipient" => n.recipient = value.to_string(),
            "notifier.verify_sender" => n.verify_sender = parse_bool(value)?,
            "notifier.enabled_done" => n.enabled_done = parse_bool(value)?,
            "notifier.enabled_paused" => n.enabled_paused = parse_bool(value)?,
            "notifier.templates.done" => n.templates.done = value.to_string(),
            "notifier.templates.paused" => n.templates.paused = value.to_string(),
            "log_level" | "log-level" => self.log_level = value.parse()?,
            _ => eyre::bail!("Unknown config key: {}", key),
        }
        Ok(())
    }
}

fn parse_bool(value: &str) -> Result<bool> {
    value
        .parse()
        .context("Invalid boolean value (use 'true' or 'false')")
}
