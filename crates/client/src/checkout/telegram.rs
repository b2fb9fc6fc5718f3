//! Telegram Bot API channel.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use gaspass_core::checkout::{CheckoutRequest, OrderSummary};

use super::{ChannelError, DeliveryChannel};
use crate::config::TelegramConfig;

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'static str,
}

#[derive(Deserialize)]
struct SendMessageResponse {
    ok: bool,
    description: Option<String>,
}

/// Posts the order summary to a Telegram chat via `sendMessage`.
#[derive(Clone)]
pub struct TelegramChannel {
    client: Client,
    config: TelegramConfig,
}

impl std::fmt::Debug for TelegramChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramChannel")
            .field("bot_token", &"[REDACTED]")
            .field("chat_id", &self.config.chat_id)
            .field("api_url", &self.config.api_url)
            .finish_non_exhaustive()
    }
}

impl TelegramChannel {
    /// Create a channel sharing `client`'s connection pool.
    #[must_use]
    pub const fn new(client: Client, config: TelegramConfig) -> Self {
        Self { client, config }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/bot{}/sendMessage",
            self.config.api_url,
            self.config.bot_token.expose_secret()
        )
    }
}

#[async_trait]
impl DeliveryChannel for TelegramChannel {
    fn name(&self) -> &str {
        "Telegram"
    }

    #[instrument(skip_all, fields(chat_id = %self.config.chat_id))]
    async fn deliver(
        &self,
        _request: &CheckoutRequest,
        summary: &OrderSummary,
    ) -> Result<(), ChannelError> {
        let message = SendMessage {
            chat_id: &self.config.chat_id,
            text: summary.as_str(),
            parse_mode: "Markdown",
        };

        let response = self
            .client
            .post(self.endpoint())
            .json(&message)
            .send()
            .await
            // without_url keeps the bot token out of the message
            .map_err(|e| ChannelError::Request(e.without_url().to_string()))?;

        if !response.status().is_success() {
            return Err(ChannelError::from_response(response).await);
        }

        let result: SendMessageResponse = response
            .json()
            .await
            .map_err(|e| ChannelError::Response(e.without_url().to_string()))?;

        if !result.ok {
            return Err(ChannelError::Api(
                result
                    .description
                    .unwrap_or_else(|| "Unknown error".to_string()),
            ));
        }

        debug!("Order posted to Telegram");
        Ok(())
    }
}
