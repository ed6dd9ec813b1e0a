//! Telegram Bot API client
//!
//! Thin JSON-over-HTTPS wrapper. Requests go to `<api_url>/bot<token>/<method>`;
//! the token never appears in errors or logs.

use std::time::Duration;

use morse_config::BotConfig;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::types::{ApiResponse, GetUpdates, Message, ReplyParameters, SendMessage, Update, User};
use crate::Result;

/// Extra time on top of the long-poll timeout before the HTTP request is abandoned.
const POLL_GRACE: Duration = Duration::from_secs(10);

/// Timeout for non-polling calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Telegram Bot API client
#[derive(Debug, Clone)]
pub struct BotClient {
    http: reqwest::Client,
    config: BotConfig,
}

impl BotClient {
    pub fn new(config: BotConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &BotConfig {
        &self.config
    }

    async fn call<P: Serialize, R: DeserializeOwned>(
        &self,
        method: &str,
        params: &P,
        timeout: Duration,
    ) -> Result<R> {
        tracing::debug!(method, "api call");

        let resp = self
            .http
            .post(self.config.method_url(method))
            .json(params)
            .timeout(timeout)
            .send()
            .await?;

        // Error responses carry a JSON envelope too, so the status is not checked here.
        let envelope: ApiResponse<R> = resp.json().await?;
        envelope.into_result()
    }

    /// The bot's own account. Fails on a bad token.
    pub async fn get_me(&self) -> Result<User> {
        self.call("getMe", &serde_json::json!({}), REQUEST_TIMEOUT).await
    }

    /// Long-poll for updates after `offset`.
    pub async fn get_updates(&self, offset: Option<i64>) -> Result<Vec<Update>> {
        let params = GetUpdates {
            offset,
            timeout: self.config.poll_timeout_secs,
            allowed_updates: &["message"],
        };
        self.call("getUpdates", &params, self.config.poll_timeout() + POLL_GRACE)
            .await
    }

    /// Send `text` to a chat, optionally quoting `reply_to`.
    pub async fn send_message(&self, chat_id: i64, text: &str, reply_to: Option<i64>) -> Result<Message> {
        let params = SendMessage {
            chat_id,
            text,
            reply_parameters: reply_to.map(|message_id| ReplyParameters {
                message_id,
                allow_sending_without_reply: true,
            }),
        };
        self.call("sendMessage", &params, REQUEST_TIMEOUT).await
    }
}
