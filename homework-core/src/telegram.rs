use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::error::PollError;

/// Delivers text messages to the single configured recipient.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_message(&self, text: &str) -> Result<(), PollError>;
}

#[derive(Debug, Deserialize)]
struct BotApiReply {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Sends messages through the Telegram Bot API `sendMessage` method.
#[derive(Clone)]
pub struct TelegramNotifier {
    client: Client,
    api_url: String,
    token: String,
    chat_id: String,
}

impl TelegramNotifier {
    pub fn new(
        client: Client,
        api_url: impl Into<String>,
        token: impl Into<String>,
        chat_id: impl Into<String>,
    ) -> Self {
        Self {
            client,
            api_url: api_url.into(),
            token: token.into(),
            chat_id: chat_id.into(),
        }
    }

    fn method_url(&self) -> String {
        format!(
            "{}/bot{}/sendMessage",
            self.api_url.trim_end_matches('/'),
            self.token
        )
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send_message(&self, text: &str) -> Result<(), PollError> {
        // The method URL embeds the bot token, so it is stripped from every error.
        let response = self
            .client
            .post(self.method_url())
            .json(&serde_json::json!({
                "chat_id": self.chat_id,
                "text": text,
            }))
            .send()
            .await
            .map_err(|e| PollError::Delivery(e.without_url().to_string()))?;

        let status = response.status();
        let reply = response.json::<BotApiReply>().await;
        match reply {
            Ok(reply) if status.is_success() && reply.ok => {
                debug!(chat_id = %self.chat_id, message = text, "message sent");
                Ok(())
            }
            Ok(reply) => Err(PollError::Delivery(format!(
                "Telegram ответил {status}: {}",
                reply.description.unwrap_or_default()
            ))),
            Err(_) => Err(PollError::Delivery(format!("Telegram ответил {status}"))),
        }
    }
}
