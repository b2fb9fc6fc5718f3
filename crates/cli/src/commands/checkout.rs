//! Checkout command.
//!
//! # Environment Variables
//!
//! - `TELEGRAM_BOT_TOKEN`, `TELEGRAM_CHAT_ID` - Telegram channel
//! - `EMAILJS_SERVICE_ID`, `EMAILJS_TEMPLATE_ID`, `EMAILJS_PUBLIC_KEY` - `EmailJS` channel
//! - `CHECKOUT_CHANNEL_TIMEOUT_SECS` - Per-channel timeout (default: 10)
//! - `CHECKOUT_CURRENCY` - Currency label (default: FCFA)

use gaspass_client::CheckoutNotifier;
use gaspass_core::Email;
use gaspass_core::checkout::ContactDetails;
use thiserror::Error;

use super::{client_config, open_cart};
use crate::output;

/// Errors that stop a checkout.
#[derive(Debug, Error)]
pub enum CheckoutCommandError {
    /// The email address was rejected before anything was sent.
    #[error("Invalid email {0:?}: {1}")]
    InvalidEmail(String, gaspass_core::EmailError),

    /// No channel accepted the order; the cart was kept.
    #[error("Order was not delivered; your cart has been kept")]
    NotDelivered,
}

/// Send the cart over every configured channel.
///
/// The cart is cleared only when at least one channel delivered.
pub async fn submit(
    name: &str,
    phone: &str,
    email: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let email = Email::parse(email)
        .map_err(|e| CheckoutCommandError::InvalidEmail(email.to_string(), e))?;
    let contact = ContactDetails::new(name, phone, email.into_inner())?;

    let config = client_config()?;
    let mut store = open_cart(&config);
    let request = store.checkout_request(contact)?;

    let notifier = CheckoutNotifier::from_config(&config);
    if notifier.channel_names().is_empty() {
        tracing::warn!("No checkout channel configured; set TELEGRAM_* or EMAILJS_* variables");
    }

    output::print(notifier.summary(&request).as_str());
    output::print("");

    let receipt = notifier.submit_cart(&mut store, &request).await;
    output::print(&output::receipt_detail(&receipt));

    if !receipt.success {
        return Err(CheckoutCommandError::NotDelivered.into());
    }
    Ok(())
}
