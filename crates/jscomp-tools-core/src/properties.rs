//! Reader for Java-style `.properties` files.
//!
//! Follows the line rules of `java.util.Properties::load`: comment lines start
//! with `#` or `!`, a trailing odd run of backslashes continues the entry on
//! the next line, and the key ends at the first unescaped `=`, `:` or blank.

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertiesSyntaxError {
    pub message: String,
    pub line: u32,
}

impl PropertiesSyntaxError {
    fn new(message: impl Into<String>, line: u32) -> Self {
        Self {
            message: message.into(),
            line,
        }
    }
}

#[derive(Debug, Error)]
pub enum PropertiesError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{path}:{line} {message}")]
    Parse {
        path: PathBuf,
        line: u32,
        message: String,
    },
}

/// Key/value pairs in the order their keys first appear.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyMap {
    entries: IndexMap<String, String>,
}

impl PropertyMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// A repeated key keeps its original position and takes the new value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.entries.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }
}

pub fn load_properties(path: &Path) -> Result<PropertyMap, PropertiesError> {
    let bytes = fs::read(path).map_err(|source| PropertiesError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let contents = decode_properties(bytes);
    parse_properties(&contents).map_err(|err| PropertiesError::Parse {
        path: path.to_path_buf(),
        line: err.line,
        message: err.message,
    })
}

/// Decodes file bytes as UTF-8, falling back to ISO-8859-1 when they are not
/// valid UTF-8.
pub fn decode_properties(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => match text.strip_prefix('\u{feff}') {
            Some(stripped) => stripped.to_string(),
            None => text,
        },
        Err(err) => err.into_bytes().into_iter().map(char::from).collect(),
    }
}

pub fn parse_properties(input: &str) -> Result<PropertyMap, PropertiesSyntaxError> {
    let mut map = PropertyMap::new();
    let natural = natural_lines(input);
    let mut idx = 0;

    while idx < natural.len() {
        let line_no = (idx + 1) as u32;
        let first = natural[idx].trim_start_matches(is_blank);
        idx += 1;
        if first.is_empty() || first.starts_with('#') || first.starts_with('!') {
            continue;
        }

        let mut logical = String::new();
        let mut segment = first;
        while continues(segment) {
            logical.push_str(&segment[..segment.len() - 1]);
            match natural.get(idx) {
                Some(next) => {
                    segment = next.trim_start_matches(is_blank);
                    idx += 1;
                }
                None => {
                    segment = "";
                    break;
                }
            }
        }
        logical.push_str(segment);

        let (key, value) = split_entry(&logical, line_no)?;
        map.insert(key, value);
    }

    Ok(map)
}

fn natural_lines(input: &str) -> Vec<&str> {
    let bytes = input.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0;
    let mut idx = 0;
    while idx < bytes.len() {
        match bytes[idx] {
            b'\n' => {
                lines.push(&input[start..idx]);
                idx += 1;
                start = idx;
            }
            b'\r' => {
                lines.push(&input[start..idx]);
                idx += 1;
                if bytes.get(idx) == Some(&b'\n') {
                    idx += 1;
                }
                start = idx;
            }
            _ => idx += 1,
        }
    }
    if start < bytes.len() {
        lines.push(&input[start..]);
    }
    lines
}

fn is_blank(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\u{c}')
}

fn continues(segment: &str) -> bool {
    let trailing = segment.bytes().rev().take_while(|byte| *byte == b'\\').count();
    trailing % 2 == 1
}

fn split_entry(logical: &str, line: u32) -> Result<(String, String), PropertiesSyntaxError> {
    let chars: Vec<char> = logical.chars().collect();
    let mut key_end = chars.len();
    let mut value_start = chars.len();
    let mut has_separator = false;
    let mut escaped = false;

    for (idx, &ch) in chars.iter().enumerate() {
        if escaped {
            escaped = false;
            continue;
        }
        if ch == '\\' {
            escaped = true;
        } else if ch == '=' || ch == ':' {
            key_end = idx;
            value_start = idx + 1;
            has_separator = true;
            break;
        } else if is_blank(ch) {
            key_end = idx;
            value_start = idx + 1;
            break;
        }
    }

    while value_start < chars.len() && is_blank(chars[value_start]) {
        value_start += 1;
    }
    if !has_separator && value_start < chars.len() && matches!(chars[value_start], '=' | ':') {
        value_start += 1;
        while value_start < chars.len() && is_blank(chars[value_start]) {
            value_start += 1;
        }
    }

    let key = unescape(&chars[..key_end], line)?;
    let value = unescape(&chars[value_start..], line)?;
    Ok((key, value))
}

fn unescape(chars: &[char], line: u32) -> Result<String, PropertiesSyntaxError> {
    let mut out = String::with_capacity(chars.len());
    // \u escapes are UTF-16 code units; pairs are joined before output.
    let mut pending: Vec<u16> = Vec::new();
    let mut iter = chars.iter().copied();

    while let Some(ch) = iter.next() {
        if ch != '\\' {
            flush_utf16(&mut out, &mut pending, line)?;
            out.push(ch);
            continue;
        }
        match iter.next() {
            Some('u') => pending.push(read_code_unit(&mut iter, line)?),
            Some(escape) => {
                flush_utf16(&mut out, &mut pending, line)?;
                out.push(match escape {
                    't' => '\t',
                    'n' => '\n',
                    'r' => '\r',
                    'f' => '\u{c}',
                    other => other,
                });
            }
            None => {}
        }
    }
    flush_utf16(&mut out, &mut pending, line)?;
    Ok(out)
}

fn read_code_unit(
    iter: &mut impl Iterator<Item = char>,
    line: u32,
) -> Result<u16, PropertiesSyntaxError> {
    let mut unit = 0u16;
    for _ in 0..4 {
        let digit = iter
            .next()
            .and_then(|ch| ch.to_digit(16))
            .ok_or_else(|| PropertiesSyntaxError::new("malformed \\uxxxx encoding", line))?;
        unit = (unit << 4) | digit as u16;
    }
    Ok(unit)
}

fn flush_utf16(
    out: &mut String,
    pending: &mut Vec<u16>,
    line: u32,
) -> Result<(), PropertiesSyntaxError> {
    if pending.is_empty() {
        return Ok(());
    }
    for decoded in char::decode_utf16(pending.drain(..)) {
        let ch = decoded
            .map_err(|_| PropertiesSyntaxError::new("unpaired surrogate in \\u escape", line))?;
        out.push(ch);
    }
    Ok(())
}
