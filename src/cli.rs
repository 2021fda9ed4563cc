use clap::{Parser, Subcommand, ValueEnum};
use std::io::IsTerminal;
use std::path::PathBuf;

/// Output format for commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// JSON format
    Json,
    /// YAML format
    Yaml,
}

impl OutputFormat {
    /// Resolve the effective output format.
    /// If user specified a format, use it.
    /// Otherwise: TTY → Text, non-TTY (pipe) → Json
    pub fn resolve(user_choice: Option<OutputFormat>) -> OutputFormat {
        match user_choice {
            Some(fmt) => fmt,
            None => {
                if std::io::stdout().is_terminal() {
                    OutputFormat::Text
                } else {
                    OutputFormat::Json
                }
            }
        }
    }
}

/// Event kinds that have a message template
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TemplateKind {
    Done,
    Paused,
}

#[derive(Parser)]
#[command(
    name = "signal-notifier",
    about = "Send Signal messages when a print finishes or pauses",
    version = env!("GIT_DESCRIBE"),
    after_help = "Logs are written to: ~/.local/share/signal-notifier/logs/signal-notifier.log"
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to signal-notifier.yaml config file")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Handle a print event from the host (always exits 0)
    Dispatch {
        /// Event name (PrintDone, PrintPaused, ...); other events are ignored
        event: String,

        /// Event payload JSON (reads from stdin if not provided)
        #[arg(long)]
        payload: Option<String>,
    },

    /// Check that the notifier is ready to send
    Check {
        /// Also ask signal-cli whether the sender is registered
        #[arg(long)]
        verify_sender: bool,
    },

    /// Render a message template without sending it
    Preview {
        /// Which template to render
        #[arg(value_enum)]
        kind: TemplateKind,

        /// File name to use for {filename}
        #[arg(long, default_value = "example.gcode")]
        file: String,

        /// Elapsed seconds to use for {elapsed_time}
        #[arg(long, default_value = "3723")]
        time: u64,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Import settings written by the legacy host plugin
    Import {
        /// Host config.yaml (or a file holding only the plugin's settings block)
        path: PathBuf,

        /// Print the converted config instead of writing it
        #[arg(long)]
        dry_run: bool,
    },

    /// Print the update-check descriptor
    UpdateInfo {
        /// Output format (default: text for TTY, json for pipes)
        #[arg(long, short = 'o', value_enum)]
        format: Option<OutputFormat>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show {
        /// Output format (default: text for TTY, json for pipes)
        #[arg(long, short = 'o', value_enum)]
        format: Option<OutputFormat>,
    },

    /// Get a configuration value
    Get {
        /// Configuration key (dot notation)
        key: String,
    },

    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,

        /// New value
        value: String,

        /// Allow changing admin-only keys (executable path, identities)
        #[arg(long)]
        admin: bool,
    },
}
