use eyre::{Context, Result};
use std::io::{self, Read};

use crate::config::Config;
use crate::hook::{PrintEvent, SignalNotifier};
use crate::message::HostIdentity;
use crate::runner::ProcessRunner;

/// Handle one host event. Nothing that goes wrong here is reported back to
/// the host: the outcome only ends up in the log.
pub fn dispatch(event: &str, payload: Option<&str>, config: &Config) -> Result<()> {
    // Don't wait on stdin for an event nobody handles
    if PrintEvent::from_name(event).is_none() {
        log::debug!("Ignoring event: {}", event);
        return Ok(());
    }

    let payload = match read_payload(payload) {
        Ok(payload) => payload,
        Err(e) => {
            log::error!("Dropping {} event: {:#}", event, e);
            return Ok(());
        }
    };

    log::info!("Dispatching print event: {}", event);
    log::debug!("Payload: {}", payload);

    let notifier = SignalNotifier::new(config, ProcessRunner, HostIdentity::detect());
    notifier.on_event(event, &payload);

    Ok(())
}

fn read_payload(payload: Option<&str>) -> Result<serde_json::Value> {
    // Read payload from stdin if not provided
    let payload_str = match payload {
        Some(p) => p.to_string(),
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read payload from stdin")?;
            buffer
        }
    };

    serde_json::from_str(&payload_str).context("Failed to parse payload JSON")
}
