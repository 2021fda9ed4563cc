//! Human-readable print durations

use chrono::TimeDelta;

/// Format a duration as e.g. "2 hours, 3 minutes".
///
/// Hours are the largest unit; zero components are left out and a zero
/// duration reads "0 seconds".
pub fn format_elapsed(seconds: u64) -> String {
    let delta = i64::try_from(seconds)
        .ok()
        .and_then(TimeDelta::try_seconds)
        .unwrap_or(TimeDelta::MAX);

    let parts: Vec<String> = [
        (delta.num_hours(), "hour"),
        (delta.num_minutes() % 60, "minute"),
        (delta.num_seconds() % 60, "second"),
    ]
    .into_iter()
    .filter(|(count, _)| *count > 0)
    .map(|(count, unit)| plural(count, unit))
    .collect();

    if parts.is_empty() {
        return plural(0, "second");
    }
    parts.join(", ")
}

fn plural(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("{} {}", count, unit)
    } else {
        format!("{} {}s", count, unit)
    }
}
