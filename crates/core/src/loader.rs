//! Parser for color dictionary text files.
//!
//! One entry per line: three numbers (red, green, blue, conventionally
//! 0–255) followed by a free-text name.
//!
//! ```text
//! ! comment
//! 255 250 250 snow
//! 248 248 255 ghost white
//! ```
//!
//! Lines that are empty or start with `!` are comments. Lines without three
//! numbers, or whose name is empty after trimming, are skipped silently.
//! Names are trimmed of spaces, tabs, commas, periods and line breaks, then
//! ASCII-cased as `Capitalized`.

use crate::color::Srgb;
use crate::error::DictionaryError;
use log::{debug, trace};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Characters stripped from both ends of a name.
const NAME_STRIP: &[char] = &[' ', '\t', ',', '.', '\r', '\n'];

/// One parsed dictionary line.
#[derive(Debug, Clone, PartialEq)]
pub struct DictionaryLine {
    /// Channel values divided by 255, not otherwise converted.
    pub color: Srgb,
    pub name: String,
}

/// Trims and re-cases a raw name. Returns `None` if nothing is left.
///
/// Only ASCII letters change case; other characters pass through.
pub fn normalize_name(raw: &str) -> Option<String> {
    let trimmed = raw.trim_matches(NAME_STRIP);
    let mut chars = trimmed.chars();
    let first = chars.next()?;
    let mut name = String::with_capacity(trimmed.len());
    name.push(first.to_ascii_uppercase());
    name.extend(chars.map(|c| c.to_ascii_lowercase()));
    Some(name)
}

/// Splits the first whitespace-delimited token off `s`.
fn next_token(s: &str) -> Option<(&str, &str)> {
    let s = s.trim_start();
    if s.is_empty() {
        return None;
    }
    let end = s.find(char::is_whitespace).unwrap_or(s.len());
    Some((&s[..end], &s[end..]))
}

fn next_channel(s: &str) -> Option<(f64, &str)> {
    let (token, rest) = next_token(s)?;
    let value: f64 = token.parse().ok()?;
    value.is_finite().then_some((value, rest))
}

/// Parses a single line. Returns `None` for comments and malformed lines.
pub fn parse_line(line: &str) -> Option<DictionaryLine> {
    if line.is_empty() || line.starts_with('!') {
        return None;
    }
    let (r, rest) = next_channel(line)?;
    let (g, rest) = next_channel(rest)?;
    let (b, rest) = next_channel(rest)?;
    let name = normalize_name(rest)?;
    Some(DictionaryLine {
        color: Srgb::from_rgb255(r, g, b),
        name,
    })
}

/// Reads every line from `reader` and returns the entries that parsed.
///
/// Bytes that are not valid UTF-8 are replaced rather than rejected. An I/O
/// error part-way through discards everything read so far.
pub fn parse_reader<R: BufRead>(mut reader: R) -> std::io::Result<Vec<DictionaryLine>> {
    let mut entries = Vec::new();
    let mut buf = Vec::new();
    let mut line_no = 0usize;
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        line_no += 1;
        let text = String::from_utf8_lossy(&buf);
        let line = text.trim_end_matches(['\n', '\r']);
        match parse_line(line) {
            Some(entry) => entries.push(entry),
            None if line.is_empty() || line.starts_with('!') => {}
            None => trace!("skipping malformed dictionary line {line_no}: {line:?}"),
        }
    }
    Ok(entries)
}

/// Opens and parses a dictionary file.
///
/// Returns `DictionaryError::SourceUnavailable` if the file cannot be opened
/// or read.
pub fn parse_file(path: &Path) -> Result<Vec<DictionaryLine>, DictionaryError> {
    let file = File::open(path).map_err(|e| DictionaryError::unavailable(path, &e))?;
    let entries =
        parse_reader(BufReader::new(file)).map_err(|e| DictionaryError::unavailable(path, &e))?;
    debug!("parsed {} entries from {}", entries.len(), path.display());
    Ok(entries)
}
