// Copyright (c) The allure-store Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reading and writing `environment.properties`.
//!
//! This is the subset of the Java properties format that Allure uses: `=` is
//! the only key/value separator, `#` and `!` start comment lines, and a
//! trailing backslash continues a logical line onto the next physical line.

use crate::{errors::PropertiesParseError, model::EnvironmentInfo};
use swrite::{SWrite, swrite};

/// Parses a properties document.
///
/// Keys and values are trimmed. A repeated key keeps its first position and
/// its last value.
pub(crate) fn parse(text: &str) -> Result<EnvironmentInfo, PropertiesParseError> {
    let mut info = EnvironmentInfo::new();
    let mut lines = text.lines().enumerate();

    while let Some((index, line)) = lines.next() {
        let line_number = index + 1;
        let line = line.trim_start();
        if line.is_empty() || line.starts_with(['#', '!']) {
            continue;
        }

        let mut logical = line.to_owned();
        while ends_with_continuation(&logical) {
            logical.pop();
            match lines.next() {
                Some((_, next)) => logical.push_str(next.trim_start()),
                None => break,
            }
        }

        let (key, value) = split_entry(&logical);
        let key = unescape(key.trim(), line_number)?;
        let value = unescape(value.trim(), line_number)?;
        info.insert(key, value);
    }

    Ok(info)
}

/// Serializes `info` with one `key=value` line per entry and a trailing
/// newline.
///
/// Characters outside printable ASCII are written as `\uXXXX` escapes.
pub(crate) fn stringify(info: &EnvironmentInfo) -> String {
    let mut out = String::new();
    for (key, value) in info {
        escape_into(&mut out, key, true);
        out.push('=');
        escape_into(&mut out, value, false);
        out.push('\n');
    }
    if out.is_empty() {
        out.push('\n');
    }
    out
}

fn ends_with_continuation(line: &str) -> bool {
    let trailing = line.bytes().rev().take_while(|&b| b == b'\\').count();
    trailing % 2 == 1
}

/// Splits at the first unescaped `=`. A line without one is a key with an
/// empty value.
fn split_entry(line: &str) -> (&str, &str) {
    let mut escaped = false;
    for (index, c) in line.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '=' => return (&line[..index], &line[index + 1..]),
            _ => {}
        }
    }
    (line, "")
}

fn unescape(raw: &str, line_number: usize) -> Result<String, PropertiesParseError> {
    let mut out = String::with_capacity(raw.len());
    // \uXXXX escapes are UTF-16 code units; surrogate pairs span two escapes.
    let mut units: Vec<u16> = Vec::new();
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            flush_units(&mut out, &mut units);
            out.push(c);
            continue;
        }
        let Some(escaped) = chars.next() else {
            break;
        };
        if escaped == 'u' {
            let hex: String = chars.by_ref().take(4).collect();
            let is_valid = hex.len() == 4 && hex.chars().all(|c| c.is_ascii_hexdigit());
            let unit = is_valid
                .then(|| u16::from_str_radix(&hex, 16).ok())
                .flatten()
                .ok_or_else(|| {
                    PropertiesParseError::new(
                        line_number,
                        format!("malformed \\uXXXX escape: \\u{hex}"),
                    )
                })?;
            units.push(unit);
            continue;
        }

        flush_units(&mut out, &mut units);
        out.push(match escaped {
            't' => '\t',
            'n' => '\n',
            'r' => '\r',
            'f' => '\x0c',
            other => other,
        });
    }

    flush_units(&mut out, &mut units);
    Ok(out)
}

fn flush_units(out: &mut String, units: &mut Vec<u16>) {
    out.extend(
        char::decode_utf16(units.drain(..)).map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER)),
    );
}

fn escape_into(out: &mut String, text: &str, is_key: bool) {
    let last = text.chars().count().saturating_sub(1);
    for (index, c) in text.chars().enumerate() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\x0c' => out.push_str("\\f"),
            '=' | ':' if is_key => {
                out.push('\\');
                out.push(c);
            }
            '#' | '!' if is_key && index == 0 => {
                out.push('\\');
                out.push(c);
            }
            // Surrounding spaces would be trimmed on read.
            ' ' if index == 0 || index == last => out.push_str("\\u0020"),
            ' '..='~' => out.push(c),
            _ => {
                let mut buf = [0u16; 2];
                for unit in c.encode_utf16(&mut buf) {
                    swrite!(out, "\\u{unit:04x}");
                }
            }
        }
    }
}
