//! Print event handling
//!
//! The host fires a hook for every lifecycle event it knows about. Only
//! finished and paused jobs are of interest; everything else is ignored.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::NotifyError;

pub mod notifier;

pub use notifier::SignalNotifier;

/// Print events the notifier reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub enum PrintEvent {
    PrintDone,
    PrintPaused,
}

impl PrintEvent {
    /// Resolve a host event name; unknown names yield `None`
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().replace(['-', '_'], "").as_str() {
            "printdone" | "jobcompleted" => Some(Self::PrintDone),
            "printpaused" | "jobpaused" => Some(Self::PrintPaused),
            _ => None,
        }
    }

    /// Short name used in log lines and for template selection
    pub fn label(&self) -> &'static str {
        match self {
            PrintEvent::PrintDone => "done",
            PrintEvent::PrintPaused => "paused",
        }
    }
}

impl fmt::Display for PrintEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrintEvent::PrintDone => write!(f, "PrintDone"),
            PrintEvent::PrintPaused => write!(f, "PrintPaused"),
        }
    }
}

/// What happened to one event
#[derive(Debug)]
pub enum Outcome {
    /// Notifications for this event kind are switched off
    Disabled,
    /// The settings failed validation; nothing was sent
    NotReady(NotifyError),
    /// Formatting or delivery failed
    Failed(NotifyError),
    Sent { recipient: String },
}
