//! String re-parsing used by the typed getters.

use std::time::Duration;

/// Platform-width integer, matching `get_int`.
pub fn parse_int(text: &str) -> Option<isize> {
    text.parse().ok()
}

pub fn parse_int64(text: &str) -> Option<i64> {
    text.parse().ok()
}

pub fn parse_float64(text: &str) -> Option<f64> {
    text.parse().ok()
}

/// Accepts `1/0`, `t/f` and `true/false` in any letter case.
pub fn parse_bool(text: &str) -> Option<bool> {
    match text.to_ascii_lowercase().as_str() {
        "1" | "t" | "true" => Some(true),
        "0" | "f" | "false" => Some(false),
        _ => None,
    }
}

/// Parses runs of `<decimal><unit>` such as `1h30m` or `1.5s`.
///
/// Units include `ns`, `us`/`µs`, `ms`, `s`, `m` and `h`. A leading `+` is
/// accepted; whitespace between runs and negative durations are rejected.
pub fn parse_duration(text: &str) -> Option<Duration> {
    let text = text.strip_prefix('+').unwrap_or(text);
    if text.chars().any(char::is_whitespace) {
        return None;
    }
    humantime::parse_duration(text).ok()
}

/// Splits on `,`, trims each part and drops the empty ones.
pub fn split_list(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_owned)
        .collect()
}
