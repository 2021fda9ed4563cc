//! Flat `{placeholder}` substitution

use once_cell::sync::Lazy;
use regex::Regex;

use super::MessageContext;
use crate::error::NotifyError;

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{([^{}]*)\}").unwrap());

/// Substitute every `{name}` in `template` with its value from `context`
pub fn format(template: &str, context: &MessageContext) -> Result<String, NotifyError> {
    let mut out = String::with_capacity(template.len());
    let mut last = 0;

    for caps in PLACEHOLDER.captures_iter(template) {
        let whole = caps.get(0).map(|m| m.range()).unwrap_or_default();
        let name = caps.get(1).map(|m| m.as_str()).unwrap_or_default();

        push_literal(&mut out, &template[last..whole.start])?;

        let value = context.get(name).ok_or_else(|| {
            NotifyError::Template(format!(
                "unknown placeholder '{{{}}}' (available: {})",
                name,
                context.keys().collect::<Vec<_>>().join(", ")
            ))
        })?;
        out.push_str(value);
        last = whole.end;
    }

    push_literal(&mut out, &template[last..])?;
    Ok(out)
}

fn push_literal(out: &mut String, literal: &str) -> Result<(), NotifyError> {
    if let Some(pos) = literal.find(['{', '}']) {
        return Err(NotifyError::Template(format!(
            "unbalanced brace near '{}'",
            &literal[pos..].chars().take(20).collect::<String>()
        )));
    }
    out.push_str(literal);
    Ok(())
}
