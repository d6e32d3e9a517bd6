use std::io::ErrorKind;
use std::path::Path;

use tracing::{debug, trace, warn};

/// Reads one `key=value` file. Returns `None` when the file is absent or
/// cannot be read; neither case is an error for the caller.
pub fn read_env_file(path: &Path) -> Option<Vec<(String, String)>> {
    match std::fs::read_to_string(path) {
        Ok(content) => {
            let entries = parse_env_file(&content);
            debug!(path = %path.display(), entries = entries.len(), "loaded env file");
            Some(entries)
        }
        Err(err) if err.kind() == ErrorKind::NotFound => {
            trace!(path = %path.display(), "env file not present");
            None
        }
        Err(err) => {
            warn!(path = %path.display(), error = %err, "skipping unreadable env file");
            None
        }
    }
}

pub fn parse_env_file(content: &str) -> Vec<(String, String)> {
    content
        .lines()
        .enumerate()
        .filter_map(|(index, line)| {
            let parsed = parse_line(line);
            if parsed.is_none() && is_malformed(line) {
                trace!(line = index + 1, "skipping line without '='");
            }
            parsed
        })
        .collect()
}

fn parse_line(line: &str) -> Option<(String, String)> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let (key, value) = line.split_once('=')?;
    Some((key.trim().to_owned(), strip_quotes(value.trim()).to_owned()))
}

fn is_malformed(line: &str) -> bool {
    let line = line.trim();
    !line.is_empty() && !line.starts_with('#') && !line.contains('=')
}

fn strip_quotes(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}
