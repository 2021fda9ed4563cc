//! Notification error taxonomy
//!
//! Every variant is non-fatal: it stops processing of the current event and
//! is logged by the hook handler. None of them reach the host.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("the path to signal-cli ('{}') doesn't point at an executable", .path.display())]
    ExecutableNotFound { path: PathBuf },

    #[error("the sender seems empty")]
    EmptySender,

    #[error("the recipient seems empty")]
    EmptyRecipient,

    #[error("the sender ('{sender}') is not registered\nCommand: '{command}'\nCommand output: '{output}'")]
    SenderNotRegistered {
        sender: String,
        command: String,
        output: String,
    },

    #[error("template error: {0}")]
    Template(String),

    #[error("invalid event payload: {0}")]
    Payload(String),

    #[error("failed to start '{command}': {source}")]
    ProcessLaunch {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("command exited with code {code}\nCommand: '{command}'\nCommand output: '{output}'")]
    ProcessExit {
        command: String,
        code: i32,
        output: String,
    },
}

impl NotifyError {
    /// Errors caused by the notifier settings rather than the event or the client
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            NotifyError::ExecutableNotFound { .. }
                | NotifyError::EmptySender
                | NotifyError::EmptyRecipient
                | NotifyError::SenderNotRegistered { .. }
        )
    }
}
