//! Checkout request, order summary and delivery receipt types.
//!
//! The transport side (sending the summary over real channels) lives in the
//! client crate; this module only holds the data and the deterministic
//! rendering so that both can be tested without a network.

use core::fmt::{self, Write as _};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cart::CartLineItem;
use crate::types::Price;

/// Programmer errors when building a checkout request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    /// A required contact field is empty.
    #[error("contact field '{0}' is required")]
    MissingField(&'static str),

    /// The cart has no items.
    #[error("cannot check out an empty cart")]
    EmptyCart,
}

/// Customer contact details collected at checkout.
///
/// Fields are trimmed and must be non-empty. No format validation is done
/// here; see [`crate::Email`] for the front-end check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactDetails {
    pub name: String,
    pub phone: String,
    pub email: String,
}

impl ContactDetails {
    /// Build contact details.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::MissingField`] for the first blank field, in
    /// the order name, phone, email.
    pub fn new(
        name: impl Into<String>,
        phone: impl Into<String>,
        email: impl Into<String>,
    ) -> Result<Self, CheckoutError> {
        Ok(Self {
            name: required("name", name.into())?,
            phone: required("phone", phone.into())?,
            email: required("email", email.into())?,
        })
    }
}

fn required(field: &'static str, value: String) -> Result<String, CheckoutError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CheckoutError::MissingField(field));
    }
    Ok(trimmed.to_owned())
}

/// An order ready to be announced.
///
/// `items` is an owned copy taken when the request was built; later cart
/// changes do not affect it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutRequest {
    pub items: Vec<CartLineItem>,
    pub total: Price,
    pub contact: ContactDetails,
}

impl CheckoutRequest {
    /// Build a request, computing the total from `items`.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::EmptyCart`] if `items` is empty.
    pub fn new(items: Vec<CartLineItem>, contact: ContactDetails) -> Result<Self, CheckoutError> {
        if items.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        let total = items.iter().map(CartLineItem::line_total).sum();
        Ok(Self {
            items,
            total,
            contact,
        })
    }
}

/// Human-readable order text sent to every channel.
///
/// Markdown, field order fixed: name, phone, email, items, total. Customer
/// and product text is escaped so it cannot open or close an entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderSummary(String);

impl OrderSummary {
    /// Render a request. `currency` is appended to every amount.
    #[must_use]
    pub fn render(request: &CheckoutRequest, currency: &str) -> Self {
        let contact = &request.contact;
        let mut text = String::from("*New order*\n\n");

        // Writing to a String cannot fail.
        let _ = writeln!(text, "*Name*: {}", Escaped(&contact.name));
        let _ = writeln!(text, "*Phone*: {}", Escaped(&contact.phone));
        let _ = writeln!(text, "*Email*: {}", Escaped(&contact.email));
        text.push_str("\n*Items*:\n");
        for item in &request.items {
            let _ = writeln!(
                text,
                "• {} × {} — {} {currency}",
                Escaped(&item.name),
                item.quantity,
                item.line_total()
            );
        }
        let _ = write!(text, "\n*Total*: {} {currency}", request.total);

        Self(text)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Markdown text with `_`, `*`, `` ` `` and `[` backslash-escaped.
struct Escaped<'a>(&'a str);

impl fmt::Display for Escaped<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in self.0.chars() {
            if matches!(c, '_' | '*' | '`' | '[') {
                f.write_char('\\')?;
            }
            f.write_char(c)?;
        }
        Ok(())
    }
}

/// Result of one channel's delivery attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ChannelOutcome {
    Delivered,
    Failed { reason: String },
}

/// A channel's name paired with its outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelReport {
    pub channel: String,
    pub outcome: ChannelOutcome,
}

impl ChannelReport {
    #[must_use]
    pub fn delivered(channel: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            outcome: ChannelOutcome::Delivered,
        }
    }

    #[must_use]
    pub fn failed(channel: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            outcome: ChannelOutcome::Failed {
                reason: reason.into(),
            },
        }
    }

    #[must_use]
    pub const fn is_delivered(&self) -> bool {
        matches!(self.outcome, ChannelOutcome::Delivered)
    }
}

impl fmt::Display for ChannelReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            ChannelOutcome::Delivered => write!(f, "delivered via {}", self.channel),
            ChannelOutcome::Failed { reason } => {
                write!(f, "failed via {} ({reason})", self.channel)
            }
        }
    }
}

/// Aggregate result of a checkout submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutReceipt {
    /// At least one channel delivered.
    pub success: bool,
    /// Per-channel outcomes joined with `", "`.
    pub message: String,
    pub reports: Vec<ChannelReport>,
}

impl CheckoutReceipt {
    /// Aggregate channel reports, keeping their order.
    #[must_use]
    pub fn from_reports(reports: Vec<ChannelReport>) -> Self {
        let success = reports.iter().any(ChannelReport::is_delivered);
        let message = if reports.is_empty() {
            "no delivery channel configured".to_owned()
        } else {
            reports
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        };
        Self {
            success,
            message,
            reports,
        }
    }
}
