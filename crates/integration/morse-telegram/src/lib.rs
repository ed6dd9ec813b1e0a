//! Morse Telegram
//!
//! Telegram front end for the transcoder: `/encode <TEXT>` and
//! `/decode <TEXT>` answered over the Bot API with long polling.
//!
//! # Modules
//! - `types` - Bot API payloads
//! - `command` - Command parsing and reply text
//! - `client` - HTTP client for the Bot API
//! - `runner` - Long-polling loop

pub mod client;
pub mod command;
pub mod runner;
pub mod types;

pub use client::BotClient;
pub use command::{reply_for, respond, split_message, Command, Reply, MESSAGE_LIMIT};
pub use runner::run;
pub use types::{Chat, Message, MessageEntity, Update, User};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TelegramError {
    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    #[error("Telegram API error ({}): {description}", .code.map_or_else(|| "?".to_string(), |c| c.to_string()))]
    Api {
        code: Option<i64>,
        description: String,
    },

    #[error("Telegram API returned ok without a result")]
    MissingResult,
}

// Request URLs embed the bot token.
impl From<reqwest::Error> for TelegramError {
    fn from(e: reqwest::Error) -> Self {
        TelegramError::Http(e.without_url())
    }
}

pub type Result<T> = std::result::Result<T, TelegramError>;
