//! Chat command parsing and dispatch
//!
//! Everything here is pure: a message goes in, the reply text comes out.
//! Sending it is the runner's job.

use crate::types::Message;

pub const HELP_TEXT: &str = r#"You can use "/encode <TEXT>" or "/decode <TEXT>" "#;
pub const UNKNOWN_TEXT: &str = r#"Command is not found. Check "/help"."#;
pub const NOTHING_TO_ENCODE: &str = "Nothing to encode. Use letters, digits or punctuation.";
pub const NOTHING_TO_DECODE: &str = "Nothing to decode. Separate signals with spaces and words with \" / \".";
pub const ENCODE_HINT: &str = "That already looks like Morse code. Try /decode.";

/// Longest text Telegram accepts in one message.
pub const MESSAGE_LIMIT: usize = 4096;

/// A bot command with its argument text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Encode(String),
    Decode(String),
    Help,
    Unknown(String),
}

impl Command {
    /// Parse `/name[@bot] args`. Returns `None` for plain messages.
    pub fn parse(text: &str) -> Option<Self> {
        let rest = text.strip_prefix('/')?;

        let (head, args) = match rest.find(char::is_whitespace) {
            Some(idx) => (&rest[..idx], rest[idx..].trim()),
            None => (rest, ""),
        };

        let name = head.split('@').next().unwrap_or_default().to_lowercase();
        if name.is_empty() {
            return None;
        }

        Some(match name.as_str() {
            "encode" => Command::Encode(args.to_string()),
            "decode" => Command::Decode(args.to_string()),
            "help" | "start" => Command::Help,
            _ => Command::Unknown(name),
        })
    }

    pub fn name(&self) -> &str {
        match self {
            Command::Encode(_) => "encode",
            Command::Decode(_) => "decode",
            Command::Help => "help",
            Command::Unknown(name) => name,
        }
    }
}

/// Outgoing reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub chat_id: i64,
    pub text: String,
    /// Message to quote, if any
    pub reply_to: Option<i64>,
}

impl Reply {
    /// The text cut into messages Telegram will accept.
    pub fn parts(&self) -> Vec<String> {
        split_message(&self.text, MESSAGE_LIMIT)
    }
}

/// Split `text` into pieces of at most `limit` characters, cutting at word
/// separators first, then at spaces, then anywhere.
pub fn split_message(text: &str, limit: usize) -> Vec<String> {
    let mut parts = Vec::new();
    pack(text, &[morse_core::WORD_SEPARATOR, " "], limit, &mut parts);
    parts
}

fn pack(text: &str, separators: &[&str], limit: usize, parts: &mut Vec<String>) {
    if text.chars().count() <= limit {
        if !text.is_empty() {
            parts.push(text.to_string());
        }
        return;
    }

    let Some((separator, finer)) = separators.split_first() else {
        let chars: Vec<char> = text.chars().collect();
        parts.extend(chars.chunks(limit.max(1)).map(|chunk| chunk.iter().collect::<String>()));
        return;
    };

    let separator_len = separator.chars().count();
    let mut current = String::new();
    let mut current_len = 0;

    for piece in text.split(separator) {
        let piece_len = piece.chars().count();

        if !current.is_empty() && current_len + separator_len + piece_len <= limit {
            current.push_str(separator);
            current.push_str(piece);
            current_len += separator_len + piece_len;
            continue;
        }

        if !current.is_empty() {
            parts.push(std::mem::take(&mut current));
            current_len = 0;
        }

        if piece_len <= limit {
            current.push_str(piece);
            current_len = piece_len;
        } else {
            pack(piece, finer, limit, parts);
        }
    }

    if !current.is_empty() {
        parts.push(current);
    }
}

/// Reply text for a command.
pub fn respond(command: &Command) -> String {
    match command {
        Command::Encode(args) => {
            let encoded = morse_core::encode(args);
            if encoded.is_empty() {
                return NOTHING_TO_ENCODE.to_string();
            }
            if morse_core::looks_like_signal_text(args) {
                return format!("{encoded}\n\n{ENCODE_HINT}");
            }
            encoded
        }
        Command::Decode(args) => {
            let decoded = morse_core::decode(args);
            if decoded.trim().is_empty() {
                return NOTHING_TO_DECODE.to_string();
            }
            decoded
        }
        Command::Help => HELP_TEXT.to_string(),
        Command::Unknown(_) => UNKNOWN_TEXT.to_string(),
    }
}

/// Build the reply for an incoming message, or `None` if it is not a command.
///
/// Transcoding results quote the original message; help and unknown-command
/// notices do not.
pub fn reply_for(message: &Message) -> Option<Reply> {
    if !message.is_command() {
        return None;
    }
    let command = Command::parse(message.text.as_deref()?)?;

    tracing::debug!(command = command.name(), chat_id = message.chat.id, "dispatching");

    let reply_to = match command {
        Command::Encode(_) | Command::Decode(_) => Some(message.message_id),
        Command::Help | Command::Unknown(_) => None,
    };

    Some(Reply {
        chat_id: message.chat.id,
        text: respond(&command),
        reply_to,
    })
}
