//! Checkout notifier.
//!
//! Announces a [`CheckoutRequest`] to every configured [`DeliveryChannel`]
//! at once and folds the per-channel results into a [`CheckoutReceipt`].
//!
//! Channel failures never become errors: a channel that errors, answers
//! with a non-success status or exceeds its timeout is reported as failed,
//! and the checkout succeeds if at least one channel delivered. Channels are
//! independent; one failing or hanging does not cancel the others.

mod emailjs;
mod telegram;

pub use emailjs::EmailJsChannel;
pub use telegram::TelegramChannel;

use std::time::Duration;

use async_trait::async_trait;
use futures::future::join_all;
use reqwest::Client;
use thiserror::Error;
use tracing::{info, instrument, warn};

use gaspass_core::cart::{CartStorage, CartStore};
use gaspass_core::checkout::{ChannelReport, CheckoutReceipt, CheckoutRequest, OrderSummary};

use crate::config::{ClientConfig, DEFAULT_CHANNEL_TIMEOUT, DEFAULT_CURRENCY};

/// Longest response body quoted in a [`ChannelError`].
const MAX_ERROR_BODY: usize = 200;

/// Errors from a single delivery attempt.
#[derive(Debug, Error)]
pub enum ChannelError {
    /// The HTTP request could not be sent.
    #[error("request failed: {0}")]
    Request(String),

    /// The service answered with a non-success status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The service accepted the request but reported an error.
    #[error("API error: {0}")]
    Api(String),

    /// The response could not be understood.
    #[error("invalid response: {0}")]
    Response(String),

    /// The channel did not finish in time.
    #[error("timed out after {0:?}")]
    Timeout(Duration),
}

impl ChannelError {
    /// Build a [`ChannelError::Status`] from a failed response, quoting the
    /// start of its body.
    pub(crate) async fn from_response(response: reqwest::Response) -> Self {
        let status = response.status().as_u16();
        let mut body = response.text().await.unwrap_or_default();
        if body.len() > MAX_ERROR_BODY {
            let cut = (0..=MAX_ERROR_BODY)
                .rev()
                .find(|i| body.is_char_boundary(*i))
                .unwrap_or(0);
            body.truncate(cut);
            body.push('…');
        }
        Self::Status { status, body }
    }
}

/// A destination for order announcements.
#[async_trait]
pub trait DeliveryChannel: Send + Sync {
    /// Human-readable channel name used in receipts and logs.
    fn name(&self) -> &str;

    /// Deliver one order.
    ///
    /// # Errors
    ///
    /// Returns `ChannelError` if the order was not accepted.
    async fn deliver(
        &self,
        request: &CheckoutRequest,
        summary: &OrderSummary,
    ) -> Result<(), ChannelError>;
}

/// Fans a checkout out to every configured channel.
pub struct CheckoutNotifier {
    channels: Vec<Box<dyn DeliveryChannel>>,
    timeout: Duration,
    currency: String,
}

impl std::fmt::Debug for CheckoutNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckoutNotifier")
            .field("channels", &self.channel_names())
            .field("timeout", &self.timeout)
            .field("currency", &self.currency)
            .finish()
    }
}

impl Default for CheckoutNotifier {
    fn default() -> Self {
        Self::new(DEFAULT_CHANNEL_TIMEOUT, DEFAULT_CURRENCY)
    }
}

impl CheckoutNotifier {
    /// Create a notifier with no channels.
    #[must_use]
    pub fn new(timeout: Duration, currency: impl Into<String>) -> Self {
        Self {
            channels: Vec::new(),
            timeout,
            currency: currency.into(),
        }
    }

    /// Create a notifier with the channels enabled in `config`, Telegram
    /// first.
    #[must_use]
    pub fn from_config(config: &ClientConfig) -> Self {
        let client = Client::new();
        let mut notifier = Self::new(config.channel_timeout, config.currency.clone());

        if let Some(telegram) = &config.telegram {
            notifier.add_channel(TelegramChannel::new(client.clone(), telegram.clone()));
        }
        if let Some(emailjs) = &config.emailjs {
            notifier.add_channel(EmailJsChannel::new(client, emailjs.clone()));
        }

        notifier
    }

    /// Add a channel. Reports follow the order channels were added in.
    pub fn add_channel(&mut self, channel: impl DeliveryChannel + 'static) {
        self.channels.push(Box::new(channel));
    }

    /// Builder-style [`CheckoutNotifier::add_channel`].
    #[must_use]
    pub fn with_channel(mut self, channel: impl DeliveryChannel + 'static) -> Self {
        self.add_channel(channel);
        self
    }

    /// Names of the configured channels.
    #[must_use]
    pub fn channel_names(&self) -> Vec<&str> {
        self.channels.iter().map(|c| c.name()).collect()
    }

    /// Render the summary that [`CheckoutNotifier::submit`] would send.
    #[must_use]
    pub fn summary(&self, request: &CheckoutRequest) -> OrderSummary {
        OrderSummary::render(request, &self.currency)
    }

    /// Announce an order on every channel and wait for all of them.
    ///
    /// With no channels configured the receipt reports failure.
    #[instrument(skip_all, fields(items = request.items.len(), channels = self.channels.len()))]
    pub async fn submit(&self, request: &CheckoutRequest) -> CheckoutReceipt {
        let summary = self.summary(request);

        let deliveries = self
            .channels
            .iter()
            .map(|channel| self.deliver_one(channel.as_ref(), request, &summary));
        let receipt = CheckoutReceipt::from_reports(join_all(deliveries).await);

        if receipt.success {
            info!(message = %receipt.message, "Checkout submitted");
        } else {
            warn!(message = %receipt.message, "Checkout not delivered");
        }

        receipt
    }

    /// Submit an order taken from `store` and empty the cart once at least
    /// one channel delivered it. An undelivered order leaves the cart as it
    /// was.
    pub async fn submit_cart<S: CartStorage + Send>(
        &self,
        store: &mut CartStore<S>,
        request: &CheckoutRequest,
    ) -> CheckoutReceipt {
        let receipt = self.submit(request).await;
        if receipt.success {
            let _ = store.clear_cart();
        }
        receipt
    }

    async fn deliver_one(
        &self,
        channel: &dyn DeliveryChannel,
        request: &CheckoutRequest,
        summary: &OrderSummary,
    ) -> ChannelReport {
        let result = tokio::time::timeout(self.timeout, channel.deliver(request, summary))
            .await
            .unwrap_or(Err(ChannelError::Timeout(self.timeout)));

        match result {
            Ok(()) => ChannelReport::delivered(channel.name()),
            Err(e) => {
                warn!(channel = channel.name(), error = %e, "Checkout channel failed");
                ChannelReport::failed(channel.name(), e.to_string())
            }
        }
    }
}
