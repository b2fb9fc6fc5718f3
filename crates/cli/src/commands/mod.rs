//! CLI command implementations.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod migrate;

use gaspass_client::config::ConfigError;
use gaspass_client::{ApiClient, ClientConfig, FileStorage};
use gaspass_core::cart::{CartState, CartStore};

/// Load client configuration from the environment.
fn client_config() -> Result<ClientConfig, ConfigError> {
    ClientConfig::from_env()
}

/// API client for the configured base URL.
fn api_client(config: &ClientConfig) -> Result<ApiClient, Box<dyn std::error::Error>> {
    ApiClient::new(&config.api_url)
        .map_err(|e| format!("invalid GASPASS_API_URL {:?}: {e}", config.api_url).into())
}

/// Open the persisted cart, logging every change it goes through.
fn open_cart(config: &ClientConfig) -> CartStore<FileStorage> {
    let mut store = CartStore::load(FileStorage::new(&config.cart_path));
    store.subscribe(|state: &CartState| {
        tracing::info!(
            lines = state.items.len(),
            items = state.total_items(),
            total = %state.total_price(),
            "Cart updated"
        );
    });
    store
}
