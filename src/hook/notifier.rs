//! Signal notification hook
//!
//! On a finished or paused print: validate the settings, render the matching
//! template and hand the message to signal-cli. Every failure is logged and
//! swallowed so the host keeps processing its events.

use std::path::Path;

use super::{Outcome, PrintEvent};
use crate::config::{NotifierSettings, SettingsSource};
use crate::error::NotifyError;
use crate::message::{self, HostIdentity, MessageContext};
use crate::runner::{CommandRunner, render_command};
use crate::validate;

/// Sends a Signal message for each enabled print event
pub struct SignalNotifier<S, R> {
    settings: S,
    runner: R,
    identity: HostIdentity,
}

impl<S: SettingsSource, R: CommandRunner> SignalNotifier<S, R> {
    pub fn new(settings: S, runner: R, identity: HostIdentity) -> Self {
        Self {
            settings,
            runner,
            identity,
        }
    }

    /// Entry point for the host: any event name, never fails
    pub fn on_event(&self, event_name: &str, payload: &serde_json::Value) {
        match PrintEvent::from_name(event_name) {
            Some(event) => {
                self.notify(event, payload);
            }
            None => log::debug!("Ignoring event: {}", event_name),
        }
    }

    /// Process one print event and log what happened
    pub fn notify(&self, event: PrintEvent, payload: &serde_json::Value) -> Outcome {
        let outcome = self.process(event, payload);

        match &outcome {
            Outcome::Disabled => {
                log::debug!("Notifications for {} events are disabled", event.label());
            }
            Outcome::NotReady(e) if e.is_configuration() => {
                log::error!("Signal notifier is not configured correctly: {}", e);
            }
            Outcome::NotReady(e) | Outcome::Failed(e @ NotifyError::ProcessLaunch { .. }) => {
                log::error!("Signal notification error: {}", e);
            }
            Outcome::Failed(e) => {
                log::error!("Notification ({}) not sent: {}", event.label(), e);
            }
            Outcome::Sent { recipient } => {
                log::info!("Notification ({}) sent to {}.", event.label(), recipient);
            }
        }

        outcome
    }

    fn process(&self, event: PrintEvent, payload: &serde_json::Value) -> Outcome {
        let settings = self.settings.notifier_settings();

        let (enabled, template) = match event {
            PrintEvent::PrintDone => (settings.enabled_done, &settings.templates.done),
            PrintEvent::PrintPaused => (settings.enabled_paused, &settings.templates.paused),
        };
        if !enabled {
            return Outcome::Disabled;
        }

        let executable = match validate::check(&settings, &self.runner) {
            Ok(path) => path,
            Err(e) => return Outcome::NotReady(e),
        };

        let rendered = MessageContext::for_event(event, payload, &self.identity)
            .and_then(|context| message::format(template, &context));
        let text = match rendered {
            Ok(text) => text,
            Err(e) => return Outcome::Failed(e),
        };

        match self.send(&executable, &settings, &text) {
            Ok(()) => Outcome::Sent {
                recipient: settings.recipient.clone(),
            },
            Err(e) => Outcome::Failed(e),
        }
    }

    fn send(&self, executable: &Path, settings: &NotifierSettings, text: &str) -> Result<(), NotifyError> {
        let args = send_args(&settings.sender, text, &settings.recipient);
        let command = render_command(executable, &args);
        log::debug!("Command notifier will run is: '{}'", command);

        let result = self.runner.run(executable, &args)?;
        if !result.success() {
            return Err(NotifyError::ProcessExit {
                command,
                code: result.exit_code,
                output: result.output,
            });
        }

        Ok(())
    }
}

/// `-u <sender> send -m <message> <recipient>`
pub fn send_args(sender: &str, message: &str, recipient: &str) -> Vec<String> {
    vec![
        "-u".to_string(),
        sender.to_string(),
        "send".to_string(),
        "-m".to_string(),
        message.to_string(),
        recipient.to_string(),
    ]
}
