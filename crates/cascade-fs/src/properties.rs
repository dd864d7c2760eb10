//! `.properties` file parsing
//!
//! Implements the line-oriented properties format: `#`/`!` comments,
//! `=`, `:` or whitespace separators, backslash line continuations and
//! the `\t \n \r \f \uXXXX` escapes. Later duplicates replace earlier ones.

use std::collections::BTreeMap;

use crate::{Error, NormalizedPath, Result, io};

const WHITESPACE: [char; 3] = [' ', '\t', '\u{c}'];

/// Load and parse a property file.
pub fn load_properties(path: &NormalizedPath) -> Result<BTreeMap<String, String>> {
    let content = io::read_text(path)?;
    parse_properties(path, &content)
}

/// Parse property file content. `origin` is only used for error reporting.
pub fn parse_properties(origin: &NormalizedPath, content: &str) -> Result<BTreeMap<String, String>> {
    let mut properties = BTreeMap::new();

    for (line, logical) in logical_lines(content) {
        let (raw_key, raw_value) = split_key_value(&logical);
        let key = unescape(raw_key).map_err(|message| Error::PropertiesParse {
            path: origin.to_native(),
            line,
            message,
        })?;
        let value = unescape(raw_value).map_err(|message| Error::PropertiesParse {
            path: origin.to_native(),
            line,
            message,
        })?;
        properties.insert(key, value);
    }

    Ok(properties)
}

/// Join continuation lines and drop blanks and comments.
///
/// Returns each logical line with the number of the physical line it
/// started on.
fn logical_lines(content: &str) -> Vec<(usize, String)> {
    let normalized = content.replace("\r\n", "\n").replace('\r', "\n");

    let mut lines = Vec::new();
    let mut current = String::new();
    let mut start_line = 0;
    let mut continuing = false;

    for (idx, raw) in normalized.split('\n').enumerate() {
        let trimmed = raw.trim_start_matches(WHITESPACE);
        if !continuing {
            if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
                continue;
            }
            start_line = idx + 1;
        }

        let trailing_backslashes = trimmed.chars().rev().take_while(|c| *c == '\\').count();
        if trailing_backslashes % 2 == 1 {
            current.push_str(&trimmed[..trimmed.len() - 1]);
            continuing = true;
        } else {
            current.push_str(trimmed);
            lines.push((start_line, std::mem::take(&mut current)));
            continuing = false;
        }
    }

    if continuing {
        lines.push((start_line, current));
    }

    lines
}

/// Split a logical line into its still-escaped key and value parts.
fn split_key_value(line: &str) -> (&str, &str) {
    let mut escaped = false;
    let mut key_end = line.len();
    let mut separator = None;

    for (idx, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '=' | ':' => {
                key_end = idx;
                separator = Some(c);
                break;
            }
            c if WHITESPACE.contains(&c) => {
                key_end = idx;
                separator = Some(c);
                break;
            }
            _ => {}
        }
    }

    let Some(separator) = separator else {
        return (line, "");
    };

    let mut rest = line[key_end + separator.len_utf8()..].trim_start_matches(WHITESPACE);
    if WHITESPACE.contains(&separator) {
        if let Some(stripped) = rest.strip_prefix(['=', ':']) {
            rest = stripped.trim_start_matches(WHITESPACE);
        }
    }

    (&line[..key_end], rest)
}

fn unescape(raw: &str) -> std::result::Result<String, String> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\u{c}'),
            Some('u') => {
                let high = read_code_unit(&mut chars)?;
                if (0xD800..=0xDBFF).contains(&high) {
                    let low = match (chars.next(), chars.next()) {
                        (Some('\\'), Some('u')) => read_code_unit(&mut chars)?,
                        _ => return Err(format!("unpaired surrogate \\u{high:04X}")),
                    };
                    if !(0xDC00..=0xDFFF).contains(&low) {
                        return Err(format!("unpaired surrogate \\u{high:04X}"));
                    }
                    let combined = 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
                    let decoded = char::from_u32(combined)
                        .ok_or_else(|| format!("invalid surrogate pair \\u{high:04X}\\u{low:04X}"))?;
                    out.push(decoded);
                } else {
                    let decoded = char::from_u32(high)
                        .ok_or_else(|| format!("invalid unicode escape \\u{high:04X}"))?;
                    out.push(decoded);
                }
            }
            Some(other) => out.push(other),
            None => {}
        }
    }

    Ok(out)
}

fn read_code_unit(chars: &mut impl Iterator<Item = char>) -> std::result::Result<u32, String> {
    let hex: String = chars.take(4).collect();
    if hex.chars().count() != 4 {
        return Err(format!("malformed \\u escape: '\\u{hex}'"));
    }
    u32::from_str_radix(&hex, 16).map_err(|_| format!("malformed \\u escape: '\\u{hex}'"))
}
