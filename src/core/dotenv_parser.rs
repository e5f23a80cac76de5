// src/core/dotenv_parser.rs

use crate::models::Entry;
use std::path::Path;

/// Parses the content of one definition file into its entries, in file order.
///
/// Rules:
/// - blank lines and lines starting with `#` are ignored;
/// - `KEY=VALUE`, optionally preceded by `export `;
/// - the key is trimmed and may not contain whitespace;
/// - a value opening with `"` or `'` runs to the next matching quote, which may
///   contain `#`; anything after the closing quote is dropped;
/// - an unquoted value ends at the first `#` preceded by whitespace, and is trimmed;
/// - no multi-line values.
///
/// Lines that do not fit are skipped with a warning. `origin` only feeds that warning.
pub fn parse(content: &str, origin: &Path) -> Vec<Entry> {
    let mut entries = Vec::new();

    for (index, raw_line) in content.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        match parse_line(line) {
            Some(entry) => entries.push(entry),
            None => log::warn!(
                t!("parser.warning.malformed_line"),
                path = origin.display(),
                line = index + 1
            ),
        }
    }

    entries
}

fn parse_line(line: &str) -> Option<Entry> {
    let line = line
        .strip_prefix("export ")
        .map(str::trim_start)
        .unwrap_or(line);

    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    if key.is_empty() || key.chars().any(char::is_whitespace) {
        return None;
    }

    Some(Entry::new(key, parse_value(value)))
}

fn parse_value(raw: &str) -> &str {
    let trimmed = raw.trim();
    ['"', '\'']
        .into_iter()
        .find_map(|quote| {
            let rest = trimmed.strip_prefix(quote)?;
            rest.get(..rest.find(quote)?)
        })
        .unwrap_or_else(|| strip_inline_comment(raw).trim())
}

fn strip_inline_comment(value: &str) -> &str {
    let mut previous = None;
    for (index, c) in value.char_indices() {
        if c == '#' && previous.is_some_and(char::is_whitespace) {
            return value.get(..index).unwrap_or(value);
        }
        previous = Some(c);
    }
    value
}
