//! Cart line items and the persisted cart state.

use serde::{Deserialize, Serialize};

use crate::catalog::Product;
use crate::types::{Price, ProductId};

/// One product entry in the cart.
///
/// Display fields and `stock` are captured from the product when it is first
/// added; they are not refreshed while the item stays in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItem {
    pub product_id: ProductId,
    pub name: String,
    pub image: String,
    pub category: String,
    /// Unit price.
    pub price: Price,
    /// Maximum quantity allowed for this line.
    pub stock: u32,
    pub quantity: u32,
}

impl CartLineItem {
    /// Build a line item for `quantity` units of a catalog product.
    #[must_use]
    pub fn from_product(product: &Product, quantity: u32) -> Self {
        Self {
            product_id: product.id,
            name: product.name.clone(),
            image: product.image.clone(),
            category: product.category_label(),
            price: product.price,
            stock: product.available_stock(),
            quantity,
        }
    }

    /// `price × quantity`.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.times(self.quantity)
    }
}

/// Contents of a cart, in insertion order.
///
/// This is also the persisted layout: `{"items": [...]}`. Totals are never
/// stored; they are recomputed from `items` on every read.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CartState {
    #[serde(default)]
    pub items: Vec<CartLineItem>,
}

impl CartState {
    /// Sum of all line quantities.
    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Sum of all line totals.
    #[must_use]
    pub fn total_price(&self) -> Price {
        self.items.iter().map(CartLineItem::line_total).sum()
    }

    /// Whether the cart has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Find the line for a product.
    #[must_use]
    pub fn get(&self, product_id: ProductId) -> Option<&CartLineItem> {
        self.items.iter().find(|item| item.product_id == product_id)
    }

    pub(crate) fn get_mut(&mut self, product_id: ProductId) -> Option<&mut CartLineItem> {
        self.items
            .iter_mut()
            .find(|item| item.product_id == product_id)
    }

    /// Cart total if `product_id`'s line held `quantity` units at
    /// `unit_price`, or `None` if that total is not representable.
    pub(crate) fn total_with(
        &self,
        product_id: ProductId,
        unit_price: Price,
        quantity: u32,
    ) -> Option<Price> {
        self.items
            .iter()
            .filter(|item| item.product_id != product_id)
            .try_fold(unit_price.checked_times(quantity)?, |total, item| {
                total.checked_add(item.price.checked_times(item.quantity)?)
            })
    }

    /// Repair a state read from storage so that every line satisfies
    /// `1 <= quantity <= stock`, product IDs are unique and the cart total
    /// is representable.
    ///
    /// Returns `true` if anything had to change.
    pub(crate) fn sanitize(&mut self) -> bool {
        let before = self.items.len();
        let mut seen = Vec::with_capacity(before);
        let mut total = Price::ZERO;
        let mut clamped = false;

        self.items.retain_mut(|item| {
            if item.quantity == 0 || item.stock == 0 || seen.contains(&item.product_id) {
                return false;
            }
            let quantity = item.quantity.min(item.stock);
            let Some(next) = item
                .price
                .checked_times(quantity)
                .and_then(|line| total.checked_add(line))
            else {
                return false;
            };
            total = next;
            seen.push(item.product_id);
            if item.quantity != quantity {
                item.quantity = quantity;
                clamped = true;
            }
            true
        });

        clamped || self.items.len() != before
    }
}
