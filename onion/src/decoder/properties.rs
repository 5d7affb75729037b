//! Java-style `.properties` decoding.
//!
//! Every value is a string. Keys are split on `.` into nested mappings, so
//! `db.host=h` is found under `db.host` with the default delimiter.

use std::io::Read;
use std::sync::Arc;

use serde_json::Value;

use super::{Decoder, read_text};
use crate::value::nest_keys;
use crate::{ConfigMap, OnionError, OnionResult};

/// Decodes `key=value`, `key: value` and `key value` lines.
///
/// Lines starting with `#` or `!` are comments. A line ending in an odd
/// number of backslashes continues on the next line, whose leading
/// whitespace is dropped. `\t`, `\n`, `\r`, `\f` and `\uXXXX` escapes are
/// understood; any other escaped character stands for itself. A later
/// duplicate key replaces the earlier one.
#[derive(Debug, Clone, Copy, Default)]
pub struct PropertiesDecoder;

impl Decoder for PropertiesDecoder {
    fn decode(&self, input: &mut dyn Read) -> OnionResult<ConfigMap> {
        let text = read_text("properties", input)?;
        let mut flat = ConfigMap::new();
        for (number, line) in logical_lines(&text) {
            let (key, value) = split_entry(&line).map_err(|reason| failure(number, reason))?;
            if key.is_empty() {
                return Err(failure(number, "missing key".to_owned()));
            }
            flat.insert(key, Value::String(value));
        }
        Ok(nest_keys(flat, "."))
    }
}

fn failure(line: usize, reason: String) -> Arc<OnionError> {
    OnionError::decode("properties", format!("line {line}: {reason}"))
}

/// Join continued lines and drop blanks and comments, keeping the
/// one-based number of the line each entry starts on.
fn logical_lines(text: &str) -> Vec<(usize, String)> {
    let mut out = Vec::new();
    let mut pending: Option<(usize, String)> = None;
    for (index, raw) in text.lines().enumerate() {
        let trimmed = raw.trim_start();
        let (start, mut joined) = match pending.take() {
            Some(open) => open,
            None => {
                if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
                    continue;
                }
                (index + 1, String::new())
            }
        };
        let trailing = trimmed.chars().rev().take_while(|c| *c == '\\').count();
        if trailing & 1 == 1 {
            joined.push_str(trimmed.strip_suffix('\\').unwrap_or(trimmed));
            pending = Some((start, joined));
        } else {
            joined.push_str(trimmed);
            out.push((start, joined));
        }
    }
    if let Some(open) = pending {
        out.push(open);
    }
    out
}

/// Split a logical line into its unescaped key and value.
fn split_entry(line: &str) -> Result<(String, String), String> {
    let mut chars = line.chars().peekable();
    let mut key = String::new();
    let mut separated = false;
    while let Some(c) = chars.next() {
        match c {
            '\\' => key.push(unescape(&mut chars)?),
            '=' | ':' => {
                separated = true;
                break;
            }
            _ if c.is_whitespace() => break,
            _ => key.push(c),
        }
    }
    while chars.peek().is_some_and(|c| c.is_whitespace()) {
        chars.next();
    }
    if !separated && chars.peek().is_some_and(|c| *c == '=' || *c == ':') {
        chars.next();
        while chars.peek().is_some_and(|c| c.is_whitespace()) {
            chars.next();
        }
    }
    let mut value = String::new();
    while let Some(c) = chars.next() {
        if c == '\\' {
            value.push(unescape(&mut chars)?);
        } else {
            value.push(c);
        }
    }
    Ok((key, value))
}

fn unescape(chars: &mut impl Iterator<Item = char>) -> Result<char, String> {
    match chars.next() {
        Some('t') => Ok('\t'),
        Some('n') => Ok('\n'),
        Some('r') => Ok('\r'),
        Some('f') => Ok('\u{c}'),
        Some('u') => {
            let digits: String = chars.take(4).collect();
            u32::from_str_radix(&digits, 16)
                .ok()
                .filter(|_| digits.len() == 4)
                .and_then(char::from_u32)
                .ok_or_else(|| format!("invalid unicode escape '\\u{digits}'"))
        }
        Some(other) => Ok(other),
        None => Ok('\\'),
    }
}
