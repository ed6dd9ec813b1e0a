//! Text <-> signal transcoding
//!
//! Both directions are lossy by policy: symbols outside the code table are
//! dropped on encode and unknown tokens are dropped on decode. The
//! `*_detailed` variants produce identical output and also report what was
//! dropped.

use std::io::Read;

use lazy_static::lazy_static;
use regex::Regex;

use crate::table::{table, LONG, SHORT};
use crate::Result;

/// Separator emitted between encoded words.
pub const WORD_SEPARATOR: &str = " / ";

/// Separator character recognised between encoded words on decode.
pub const WORD_SEPARATOR_CHAR: char = '/';

lazy_static! {
    static ref SIGNAL_PATTERN: Regex = Regex::new(r"^[\.\-\s/]+$").unwrap();
}

/// Result of a transcoding pass with the dropped input units.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    pub output: String,
    /// Unsupported symbols (encode) or unknown tokens (decode), in input order.
    pub dropped: Vec<String>,
}

impl Transcript {
    pub fn is_lossless(&self) -> bool {
        self.dropped.is_empty()
    }
}

/// Encode plain text into signal text.
///
/// Input is trimmed and split into words on single spaces. Each symbol is
/// upper-cased on its own, so characters that upper-case to several (`ß`) are
/// dropped rather than expanded. Words without any supported symbol are left
/// out entirely.
pub fn encode(text: &str) -> String {
    encode_with(text, |_| {})
}

/// Decode signal text into upper-case plain text.
///
/// Words are split on `/` regardless of surrounding spacing, signals within a
/// word on single spaces. Unknown signals contribute nothing.
pub fn decode(signal_text: &str) -> String {
    decode_with(signal_text, |_| {})
}

/// [`encode`], also reporting unsupported symbols. Whitespace is not reported.
pub fn encode_detailed(text: &str) -> Transcript {
    let mut dropped = Vec::new();
    let output = encode_with(text, |c| {
        if !c.is_whitespace() {
            dropped.push(c.to_string());
        }
    });
    Transcript { output, dropped }
}

/// [`decode`], also reporting unknown tokens.
pub fn decode_detailed(signal_text: &str) -> Transcript {
    let mut dropped = Vec::new();
    let output = decode_with(signal_text, |token| dropped.push(token.to_string()));
    Transcript { output, dropped }
}

/// Read the whole stream, then [`encode`] it.
pub fn encode_reader<R: Read>(reader: R) -> Result<String> {
    encode_reader_detailed(reader).map(|transcript| transcript.output)
}

/// Read the whole stream, then [`decode`] it.
pub fn decode_reader<R: Read>(reader: R) -> Result<String> {
    decode_reader_detailed(reader).map(|transcript| transcript.output)
}

/// Read the whole stream, then [`encode_detailed`] it.
pub fn encode_reader_detailed<R: Read>(mut reader: R) -> Result<Transcript> {
    let text = read_input(&mut reader)?;
    Ok(encode_detailed(&text))
}

/// Read the whole stream, then [`decode_detailed`] it.
pub fn decode_reader_detailed<R: Read>(mut reader: R) -> Result<Transcript> {
    let text = read_input(&mut reader)?;
    Ok(decode_detailed(&text))
}

/// True when `text` contains only marks, separators and whitespace, with at
/// least one mark.
pub fn looks_like_signal_text(text: &str) -> bool {
    let trimmed = text.trim();
    SIGNAL_PATTERN.is_match(trimmed) && trimmed.contains(|c: char| c == SHORT || c == LONG)
}

fn read_input<R: Read>(reader: &mut R) -> Result<String> {
    let mut buf = String::new();
    reader.read_to_string(&mut buf)?;
    Ok(buf)
}

fn encode_with(text: &str, mut on_drop: impl FnMut(char)) -> String {
    let mut words: Vec<String> = Vec::new();

    for word in text.trim().split(' ') {
        let mut signals: Vec<&str> = Vec::new();

        for symbol in word.chars() {
            match table().lookup_by_symbol(symbol) {
                Some(signal) => signals.push(signal),
                None => on_drop(symbol),
            }
        }

        if !signals.is_empty() {
            words.push(signals.join(" "));
        }
    }

    words.join(WORD_SEPARATOR)
}

fn decode_with(signal_text: &str, mut on_drop: impl FnMut(&str)) -> String {
    let mut words: Vec<String> = Vec::new();

    for segment in signal_text.split(WORD_SEPARATOR_CHAR) {
        let mut word = String::new();

        for token in segment.trim().split(' ') {
            match table().lookup_by_signal(token) {
                Some(symbol) => word.push(symbol),
                None if token.is_empty() => {}
                None => on_drop(token),
            }
        }

        words.push(word);
    }

    words.join(" ")
}
