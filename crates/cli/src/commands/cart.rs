//! Local cart commands.
//!
//! The cart lives in a JSON file (`GASPASS_CART_PATH`, default
//! `<data dir>/gaspass/cart.json`) and survives between runs.

use gaspass_core::ProductId;
use gaspass_core::cart::{CartLineItem, CartOutcome, CartStorage, CartStore};

use super::{api_client, client_config, open_cart};
use crate::output;

type Result = std::result::Result<(), Box<dyn std::error::Error>>;

/// Show cart contents.
pub fn show() -> Result {
    let config = client_config()?;
    let store = open_cart(&config);
    output::print(&output::cart_table(&store.snapshot(), &config.currency));
    Ok(())
}

/// Add a product, fetching its current details from the API.
pub async fn add(id: ProductId, quantity: u32) -> Result {
    let config = client_config()?;
    let product = api_client(&config)?.product(id).await?;

    if !product.in_stock() {
        return Err(format!("{} is out of stock", product.name).into());
    }

    let mut store = open_cart(&config);
    let outcome = store.add_to_cart(CartLineItem::from_product(&product, quantity));
    output::print(&describe(&product.name, outcome));
    Ok(())
}

/// Set a line's quantity; zero removes it.
pub fn update(id: ProductId, quantity: u32) -> Result {
    let config = client_config()?;
    let mut store = open_cart(&config);
    let name = line_name(&store, id);
    let outcome = store.update_quantity(id, quantity);
    output::print(&describe(&name, outcome));
    Ok(())
}

/// Remove a line.
pub fn remove(id: ProductId) -> Result {
    let config = client_config()?;
    let mut store = open_cart(&config);
    let name = line_name(&store, id);
    let outcome = store.remove_from_cart(id);
    output::print(&describe(&name, outcome));
    Ok(())
}

/// Empty the cart.
pub fn clear() -> Result {
    let config = client_config()?;
    let mut store = open_cart(&config);
    let message = match store.clear_cart() {
        CartOutcome::Unchanged => "Cart is already empty.",
        _ => "Cart cleared.",
    };
    output::print(message);
    Ok(())
}

fn line_name<S: CartStorage>(store: &CartStore<S>, id: ProductId) -> String {
    store
        .get(id)
        .map_or_else(|| format!("Product #{id}"), |item| item.name.clone())
}

fn describe(name: &str, outcome: CartOutcome) -> String {
    match outcome {
        CartOutcome::Added { quantity } => format!("Added {name} ({quantity} in cart)."),
        CartOutcome::Updated { quantity } => format!("{name}: {quantity} in cart."),
        CartOutcome::Removed => format!("Removed {name}."),
        CartOutcome::Unchanged => format!("{name}: nothing to change."),
        CartOutcome::StockExceeded {
            requested,
            available,
        } => format!("{name}: only {available} in stock, cannot hold {requested}."),
        CartOutcome::TotalOverflow => format!("{name}: cart total would be too large."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_stock_exceeded() {
        let text = describe(
            "Casque",
            CartOutcome::StockExceeded {
                requested: 10,
                available: 5,
            },
        );
        assert_eq!(text, "Casque: only 5 in stock, cannot hold 10.");
    }

    #[test]
    fn test_describe_added() {
        assert_eq!(
            describe("Casque", CartOutcome::Added { quantity: 3 }),
            "Added Casque (3 in cart)."
        );
    }

    #[test]
    fn test_describe_total_overflow() {
        assert_eq!(
            describe("Casque", CartOutcome::TotalOverflow),
            "Casque: cart total would be too large."
        );
    }
}
