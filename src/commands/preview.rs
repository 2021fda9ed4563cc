use eyre::Result;

use crate::cli::TemplateKind;
use crate::config::Config;
use crate::error::NotifyError;
use crate::hook::PrintEvent;
use crate::message::{self, HostIdentity, MessageContext};

pub fn run(kind: TemplateKind, file: &str, time: u64, config: &Config) -> Result<()> {
    let templates = &config.notifier.templates;
    let (event, template) = match kind {
        TemplateKind::Done => (PrintEvent::PrintDone, &templates.done),
        TemplateKind::Paused => (PrintEvent::PrintPaused, &templates.paused),
    };

    let text = render(event, template, file, time, &HostIdentity::detect())?;
    println!("{}", text);
    Ok(())
}

/// Render a template the same way a real event would
pub fn render(
    event: PrintEvent,
    template: &str,
    file: &str,
    seconds: u64,
    identity: &HostIdentity,
) -> Result<String, NotifyError> {
    let payload = serde_json::json!({"file": file, "time": seconds});
    let context = MessageContext::for_event(event, &payload, identity)?;
    message::format(template, &context)
}
