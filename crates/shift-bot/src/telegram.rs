//! Minimal Telegram Bot API transport: long polling in, plain text out.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Seconds the server holds a `getUpdates` call open.
pub const POLL_TIMEOUT_SECS: u64 = 30;

// The HTTP timeout has to outlive the long poll.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(POLL_TIMEOUT_SECS + 10);

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
    pub edited_message: Option<Message>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub chat: Chat,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

/// A chat message as the handler sees it. Non-text messages carry no text;
/// an edited message is answered like a new one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingMessage {
    pub chat_id: i64,
    pub text: Option<String>,
}

impl Update {
    pub fn into_incoming(self) -> Option<IncomingMessage> {
        let message = self.message.or(self.edited_message)?;
        Some(IncomingMessage {
            chat_id: message.chat.id,
            text: message.text,
        })
    }
}

#[derive(Serialize)]
struct GetUpdates {
    #[serde(skip_serializing_if = "Option::is_none")]
    offset: Option<i64>,
    timeout: u64,
    allowed_updates: [&'static str; 2],
}

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: i64,
    text: &'a str,
}

pub struct TelegramClient {
    client: reqwest::Client,
    // Contains the bot token; never log it.
    base_url: String,
}

impl TelegramClient {
    pub fn new(api_url: &str, bot_token: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Building Telegram HTTP client")?;
        Ok(Self {
            client,
            base_url: format!("{}/bot{}", api_url.trim_end_matches('/'), bot_token),
        })
    }

    async fn call<B, T>(&self, method: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response: ApiResponse<T> = self
            .client
            .post(format!("{}/{}", self.base_url, method))
            .json(body)
            .send()
            .await
            .map_err(|e| e.without_url())
            .with_context(|| format!("Calling Telegram {method}"))?
            .json()
            .await
            .map_err(|e| e.without_url())
            .with_context(|| format!("Decoding Telegram {method} response"))?;

        if !response.ok {
            bail!(
                "Telegram {method} failed: {}",
                response.description.as_deref().unwrap_or("no description")
            );
        }
        response
            .result
            .with_context(|| format!("Telegram {method} returned no result"))
    }

    pub async fn get_me(&self) -> Result<User> {
        self.call("getMe", &serde_json::json!({})).await
    }

    /// Long-poll for updates after `offset`.
    pub async fn get_updates(&self, offset: Option<i64>) -> Result<Vec<Update>> {
        let body = GetUpdates {
            offset,
            timeout: POLL_TIMEOUT_SECS,
            allowed_updates: ["message", "edited_message"],
        };
        self.call("getUpdates", &body).await
    }

    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<()> {
        let _: serde_json::Value = self
            .call("sendMessage", &SendMessage { chat_id, text })
            .await?;
        Ok(())
    }
}
