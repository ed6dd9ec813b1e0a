//! Code Table
//!
//! The static bijection between plain-text symbols and their signal
//! sequences. The forward table below is the single source of truth; the
//! reverse direction is derived from it once, on first use.

use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::{Error, Result};

/// Short signal mark.
pub const SHORT: char = '.';
/// Long signal mark.
pub const LONG: char = '-';

/// Forward table, in display order.
///
/// Sources:
/// - https://morsecode.world/international/morse.html
/// - https://morsedecoder.com/tr/
const ENTRIES: &[(char, &str)] = &[
    // Latin
    ('A', ".-"),
    ('B', "-..."),
    ('C', "-.-."),
    ('D', "-.."),
    ('E', "."),
    ('F', "..-."),
    ('G', "--."),
    ('H', "...."),
    ('I', ".."),
    ('J', ".---"),
    ('K', "-.-"),
    ('L', ".-.."),
    ('M', "--"),
    ('N', "-."),
    ('O', "---"),
    ('P', ".--."),
    ('Q', "--.-"),
    ('R', ".-."),
    ('S', "..."),
    ('T', "-"),
    ('U', "..-"),
    ('V', "...-"),
    ('W', ".--"),
    ('X', "-..-"),
    ('Y', "-.--"),
    ('Z', "--.."),
    // Turkish
    ('Ç', "-.-.."),
    ('Ğ', "--.-."),
    ('İ', ".-..-"),
    ('Ö', "---."),
    ('Ş', ".--.."),
    ('Ü', "..--"),
    // Continental (Gerke)
    ('Á', ".--.-"),
    ('Ä', ".-.-"),
    ('É', "..-.."),
    ('Ñ', "--.--"),
    // Digits
    ('1', ".----"),
    ('2', "..---"),
    ('3', "...--"),
    ('4', "....-"),
    ('5', "....."),
    ('6', "-...."),
    ('7', "--..."),
    ('8', "---.."),
    ('9', "----."),
    ('0', "-----"),
    // Punctuation
    ('.', ".-.-.-"),
    (':', "---..."),
    (',', "--..--"),
    (';', "-.-.-"),
    ('?', "..--.."),
    ('=', "-...-"),
    ('\'', ".----."),
    ('/', "-..-."),
    ('!', "-.-.--"),
    ('-', "-....-"),
    ('_', "..--.-"),
    ('"', ".-..-."),
    ('(', "-.--."),
    (')', "-.--.-"),
    ('$', "...-..-"),
    ('&', ".-..."),
    ('@', ".--.-."),
    ('+', ".-.-."),
];

lazy_static! {
    static ref CODE_TABLE: CodeTable = match CodeTable::from_entries(ENTRIES) {
        Ok(table) => table,
        Err(e) => panic!("built-in code table is invalid: {e}"),
    };
}

/// The shipped code table.
pub fn table() -> &'static CodeTable {
    &CODE_TABLE
}

/// Bidirectional symbol <-> signal lookup.
#[derive(Debug, Clone)]
pub struct CodeTable {
    entries: Vec<(char, &'static str)>,
    forward: HashMap<char, &'static str>,
    reverse: HashMap<&'static str, char>,
}

impl CodeTable {
    /// Build a table from forward entries, deriving the reverse map.
    ///
    /// Every signal must be a non-empty run of [`SHORT`]/[`LONG`] marks and
    /// both symbols and signals must be unique.
    pub fn from_entries(entries: &[(char, &'static str)]) -> Result<Self> {
        let mut forward = HashMap::with_capacity(entries.len());
        let mut reverse = HashMap::with_capacity(entries.len());

        for &(symbol, signal) in entries {
            if signal.is_empty() || !signal.chars().all(|c| c == SHORT || c == LONG) {
                return Err(Error::InvalidSignal {
                    symbol,
                    signal: signal.to_string(),
                });
            }

            if forward.insert(symbol, signal).is_some() {
                return Err(Error::DuplicateSymbol(symbol));
            }

            if let Some(first) = reverse.insert(signal, symbol) {
                return Err(Error::DuplicateSignal {
                    signal: signal.to_string(),
                    first,
                    second: symbol,
                });
            }
        }

        tracing::debug!(symbols = entries.len(), "code table built");

        Ok(Self {
            entries: entries.to_vec(),
            forward,
            reverse,
        })
    }

    /// Signal sequence for a symbol. Case-insensitive.
    pub fn lookup_by_symbol(&self, symbol: char) -> Option<&'static str> {
        let mut upper = symbol.to_uppercase();
        match (upper.next(), upper.next()) {
            (Some(c), None) => self.forward.get(&c).copied(),
            _ => None,
        }
    }

    /// Symbol for an exact signal sequence.
    pub fn lookup_by_signal(&self, signal: &str) -> Option<char> {
        self.reverse.get(signal).copied()
    }

    /// `(symbol, signal)` pairs in table order.
    pub fn entries(&self) -> impl Iterator<Item = (char, &'static str)> + '_ {
        self.entries.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
