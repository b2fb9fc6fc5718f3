//! Gaspass client library.
//!
//! The consumer side of the storefront:
//!
//! - [`api`] - typed client for the Data Access API
//! - [`storage`] - JSON file persistence for the cart store
//! - [`checkout`] - order announcements over Telegram and `EmailJS`
//! - [`config`] - environment-driven settings for all of the above

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod checkout;
pub mod config;
pub mod storage;

pub use api::{ApiClient, ApiError, ProductQuery, SearchQuery};
pub use checkout::{
    ChannelError, CheckoutNotifier, DeliveryChannel, EmailJsChannel, TelegramChannel,
};
pub use config::ClientConfig;
pub use storage::FileStorage;
