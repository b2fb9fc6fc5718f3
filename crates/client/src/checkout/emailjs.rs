//! `EmailJS` REST channel.
//!
//! Sends the order through an `EmailJS` template. The template receives the
//! customer's name, phone and email alongside the rendered summary as
//! `message`.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::Serialize;
use tracing::{debug, instrument};

use gaspass_core::checkout::{CheckoutRequest, OrderSummary};

use super::{ChannelError, DeliveryChannel};
use crate::config::EmailJsConfig;

#[derive(Serialize)]
struct SendEmail<'a> {
    service_id: &'a str,
    template_id: &'a str,
    user_id: &'a str,
    template_params: TemplateParams<'a>,
}

#[derive(Serialize)]
struct TemplateParams<'a> {
    name: &'a str,
    phone: &'a str,
    email: &'a str,
    message: &'a str,
}

/// Sends the order via the `EmailJS` `email/send` endpoint.
#[derive(Clone)]
pub struct EmailJsChannel {
    client: Client,
    config: EmailJsConfig,
}

impl std::fmt::Debug for EmailJsChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailJsChannel")
            .field("service_id", &self.config.service_id)
            .field("template_id", &self.config.template_id)
            .field("public_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl EmailJsChannel {
    /// Create a channel sharing `client`'s connection pool.
    #[must_use]
    pub const fn new(client: Client, config: EmailJsConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl DeliveryChannel for EmailJsChannel {
    fn name(&self) -> &str {
        "EmailJS"
    }

    #[instrument(skip_all, fields(template_id = %self.config.template_id))]
    async fn deliver(
        &self,
        request: &CheckoutRequest,
        summary: &OrderSummary,
    ) -> Result<(), ChannelError> {
        let contact = &request.contact;
        let email = SendEmail {
            service_id: &self.config.service_id,
            template_id: &self.config.template_id,
            user_id: self.config.public_key.expose_secret(),
            template_params: TemplateParams {
                name: &contact.name,
                phone: &contact.phone,
                email: &contact.email,
                message: summary.as_str(),
            },
        };

        let response = self
            .client
            .post(format!("{}/api/v1.0/email/send", self.config.api_url))
            .json(&email)
            .send()
            .await
            .map_err(|e| ChannelError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ChannelError::from_response(response).await);
        }

        debug!(to = %contact.email, "Order sent via EmailJS");
        Ok(())
    }
}
