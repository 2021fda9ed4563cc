//! Message building
//!
//! Turns an event payload into the placeholder values a template can use
//! and renders the configured template.

use indexmap::IndexMap;
use std::path::Path;

use crate::error::NotifyError;
use crate::hook::PrintEvent;

pub mod elapsed;
pub mod template;

pub use elapsed::format_elapsed;
pub use template::format;

/// Machine and account the notifier runs as
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostIdentity {
    pub host: String,
    pub user: String,
}

impl HostIdentity {
    pub fn new(host: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            user: user.into(),
        }
    }

    /// Resolve the current hostname and login name
    pub fn detect() -> Self {
        let host = hostname::get()
            .map(|h| h.to_string_lossy().into_owned())
            .unwrap_or_else(|e| {
                log::warn!("Failed to read hostname: {}", e);
                "unknown".to_string()
            });

        let user = login_name(|key| std::env::var(key).ok());

        Self::new(host, user)
    }
}

/// Variables that name the login user, in the order they are consulted
const LOGIN_VARS: [&str; 4] = ["LOGNAME", "USER", "LNAME", "USERNAME"];

fn login_name(lookup: impl Fn(&str) -> Option<String>) -> String {
    LOGIN_VARS
        .iter()
        .find_map(|key| lookup(key).filter(|v| !v.is_empty()))
        .unwrap_or_else(|| "unknown".to_string())
}

/// Placeholder values for one event
#[derive(Debug, Clone, Default)]
pub struct MessageContext {
    values: IndexMap<String, String>,
}

impl MessageContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: &str, value: impl Into<String>) {
        self.values.insert(key.to_string(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Build the context for a print event from its payload
    pub fn for_event(
        event: PrintEvent,
        payload: &serde_json::Value,
        identity: &HostIdentity,
    ) -> Result<Self, NotifyError> {
        let file = payload
            .get("file")
            .or_else(|| payload.get("name"))
            .and_then(|v| v.as_str())
            .ok_or_else(|| NotifyError::Payload("missing 'file' in payload".to_string()))?;

        let filename = Path::new(file)
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_else(|| file.to_string());

        let mut context = Self::new()
            .with("filename", filename)
            .with("host", identity.host.as_str())
            .with("user", identity.user.as_str());

        if event == PrintEvent::PrintDone {
            let seconds = payload
                .get("time")
                .and_then(|v| v.as_f64())
                .ok_or_else(|| NotifyError::Payload("missing or non-numeric 'time' in payload".to_string()))?;
            if !seconds.is_finite() || seconds < 0.0 {
                return Err(NotifyError::Payload(format!("invalid elapsed time: {}", seconds)));
            }
            context.insert("elapsed_time", format_elapsed(seconds as u64));
        }

        Ok(context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn identity() -> HostIdentity {
        HostIdentity::new("octopi", "pi")
    }

    #[test]
    fn test_done_context() {
        let payload = json!({"file": "/home/pi/.octoprint/uploads/benchy.gcode", "time": 3723.4});
        let context = MessageContext::for_event(PrintEvent::PrintDone, &payload, &identity()).unwrap();

        assert_eq!(context.get("filename"), Some("benchy.gcode"));
        assert_eq!(context.get("host"), Some("octopi"));
        assert_eq!(context.get("user"), Some("pi"));
        assert_eq!(context.get("elapsed_time"), Some("1 hour, 2 minutes, 3 seconds"));
    }

    #[test]
    fn test_paused_context_has_no_elapsed_time() {
        let payload = json!({"file": "benchy.gcode"});
        let context = MessageContext::for_event(PrintEvent::PrintPaused, &payload, &identity()).unwrap();

        assert_eq!(context.get("filename"), Some("benchy.gcode"));
        assert_eq!(context.get("elapsed_time"), None);
        assert_eq!(context.keys().collect::<Vec<_>>(), vec!["filename", "host", "user"]);
    }

    #[test]
    fn test_name_fallback() {
        let payload = json!({"name": "cube.gcode"});
        let context = MessageContext::for_event(PrintEvent::PrintPaused, &payload, &identity()).unwrap();
        assert_eq!(context.get("filename"), Some("cube.gcode"));
    }

    #[test]
    fn test_missing_file_is_payload_error() {
        let err = MessageContext::for_event(PrintEvent::PrintPaused, &json!({}), &identity()).unwrap_err();
        assert!(matches!(err, NotifyError::Payload(_)));
    }

    #[test]
    fn test_done_requires_time() {
        let payload = json!({"file": "cube.gcode"});
        let err = MessageContext::for_event(PrintEvent::PrintDone, &payload, &identity()).unwrap_err();
        assert!(matches!(err, NotifyError::Payload(_)));

        let payload = json!({"file": "cube.gcode", "time": -5});
        let err = MessageContext::for_event(PrintEvent::PrintDone, &payload, &identity()).unwrap_err();
        assert!(matches!(err, NotifyError::Payload(_)));
    }

    #[test]
    fn test_login_name_prefers_logname() {
        let env = |key: &str| match key {
            "LOGNAME" => Some("octo".to_string()),
            "USER" => Some("root".to_string()),
            _ => None,
        };
        assert_eq!(login_name(env), "octo");
    }

    #[test]
    fn test_login_name_without_user_var() {
        // Service managers often set LOGNAME but not USER
        let env = |key: &str| (key == "LOGNAME").then(|| "pi".to_string());
        assert_eq!(login_name(env), "pi");

        let env = |key: &str| match key {
            "LOGNAME" => Some(String::new()),
            "USERNAME" => Some("pi".to_string()),
            _ => None,
        };
        assert_eq!(login_name(env), "pi");

        assert_eq!(login_name(|_| None), "unknown");
    }

    #[test]
    fn test_detect_identity_is_not_empty() {
        let identity = HostIdentity::detect();
        assert!(!identity.host.is_empty());
        assert!(!identity.user.is_empty());
    }
}
