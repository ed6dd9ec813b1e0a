//! Morse Core
//!
//! Text <-> Morse code transcoding over a fixed code table.
//!
//! # Modules
//! - `table` - Static symbol <-> signal bijection
//! - `transcoder` - Encode/decode of whole messages
//!
//! ```
//! assert_eq!(morse_core::encode("sos"), "... --- ...");
//! assert_eq!(morse_core::decode("... --- ... / ..-."), "SOS F");
//! ```

pub mod table;
pub mod transcoder;

pub use table::{table, CodeTable, LONG, SHORT};
pub use transcoder::{
    decode, decode_detailed, decode_reader, decode_reader_detailed, encode, encode_detailed,
    encode_reader, encode_reader_detailed, looks_like_signal_text, Transcript, WORD_SEPARATOR,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("There is an issue with input: {0}")]
    Input(#[from] std::io::Error),

    #[error("Signal {signal:?} is assigned to both {first:?} and {second:?}")]
    DuplicateSignal {
        signal: String,
        first: char,
        second: char,
    },

    #[error("Symbol {0:?} appears more than once")]
    DuplicateSymbol(char),

    #[error("Invalid signal {signal:?} for symbol {symbol:?}")]
    InvalidSignal { symbol: char, signal: String },
}

pub type Result<T> = std::result::Result<T, Error>;
