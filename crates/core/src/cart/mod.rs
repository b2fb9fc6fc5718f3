//! The shopping cart store.
//!
//! [`CartStore`] is the single owner of a browsing session's [`CartState`].
//! Every mutation keeps the line-item invariants, writes the new state to
//! its [`CartStorage`] and then notifies subscribed [`CartObserver`]s, all
//! inside the same call.
//!
//! # Invariants
//!
//! - Product IDs are unique within the cart.
//! - Every line satisfies `1 <= quantity <= stock`. A request that would
//!   push a line above its stock is rejected with
//!   [`CartOutcome::StockExceeded`] and the line keeps its previous quantity.
//! - Setting a quantity to zero removes the line.
//! - The cart total is always representable. A change that would overflow
//!   it is rejected with [`CartOutcome::TotalOverflow`], and stored lines
//!   that overflow it are dropped on load.
//!
//! None of the operations return errors. Storage failures are logged and the
//! in-memory state stays authoritative.
//!
//! # Example
//!
//! ```
//! use gaspass_core::cart::{CartLineItem, CartOutcome, CartStore, MemoryStorage};
//! use gaspass_core::{Price, ProductId};
//!
//! let mut cart = CartStore::load(MemoryStorage::new());
//! let item = CartLineItem {
//!     product_id: ProductId::new(1),
//!     name: "Casque".into(),
//!     image: "casque.png".into(),
//!     category: "Audio".into(),
//!     price: Price::from(1000),
//!     stock: 5,
//!     quantity: 3,
//! };
//!
//! assert_eq!(cart.add_to_cart(item), CartOutcome::Added { quantity: 3 });
//! assert_eq!(cart.total_price(), Price::from(3000));
//! assert_eq!(
//!     cart.update_quantity(ProductId::new(1), 10),
//!     CartOutcome::StockExceeded { requested: 10, available: 5 }
//! );
//! ```

mod item;
mod storage;

pub use item::{CartLineItem, CartState};
pub use storage::{CartStorage, MemoryStorage, StorageError};

use tracing::{debug, warn};

use crate::checkout::{CheckoutError, CheckoutRequest, ContactDetails};
use crate::types::{Price, ProductId};

/// Result of a cart mutation.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartOutcome {
    /// A new line was inserted.
    Added { quantity: u32 },
    /// An existing line now has this quantity.
    Updated { quantity: u32 },
    /// The line was removed.
    Removed,
    /// Nothing changed (unknown product, or the quantity was already set).
    Unchanged,
    /// The request would exceed the line's stock and was rejected.
    StockExceeded { requested: u32, available: u32 },
    /// The request would make the cart total unrepresentable and was
    /// rejected.
    TotalOverflow,
}

impl CartOutcome {
    /// Whether the cart contents changed.
    #[must_use]
    pub const fn changed(&self) -> bool {
        matches!(
            self,
            Self::Added { .. } | Self::Updated { .. } | Self::Removed
        )
    }
}

/// Receives the new cart state after every change.
pub trait CartObserver: Send {
    /// Called after the change has been persisted.
    fn cart_changed(&self, state: &CartState);
}

impl<F> CartObserver for F
where
    F: Fn(&CartState) + Send,
{
    fn cart_changed(&self, state: &CartState) {
        self(state);
    }
}

/// Handle returned by [`CartStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Owned, persisted shopping cart.
pub struct CartStore<S: CartStorage> {
    state: CartState,
    storage: S,
    observers: Vec<(SubscriptionId, Box<dyn CartObserver>)>,
    next_subscription: u64,
}

impl<S: CartStorage> std::fmt::Debug for CartStore<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("state", &self.state)
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}

impl<S: CartStorage> CartStore<S> {
    /// Open the cart persisted in `storage`.
    ///
    /// Missing data starts an empty cart. Unreadable or corrupt data is
    /// logged and also starts an empty cart.
    pub fn load(storage: S) -> Self {
        let state = match storage.load() {
            Ok(Some(blob)) => match serde_json::from_str::<CartState>(&blob) {
                Ok(mut state) => {
                    if state.sanitize() {
                        warn!("Stored cart violated line invariants and was repaired");
                    }
                    state
                }
                Err(e) => {
                    warn!(error = %e, "Stored cart is corrupt, starting empty");
                    CartState::default()
                }
            },
            Ok(None) => CartState::default(),
            Err(e) => {
                warn!(error = %e, "Failed to read stored cart, starting empty");
                CartState::default()
            }
        };

        debug!(items = state.items.len(), "Cart loaded");

        Self {
            state,
            storage,
            observers: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Add a product, or more units of a product already in the cart.
    ///
    /// A requested quantity of zero is treated as one.
    pub fn add_to_cart(&mut self, item: CartLineItem) -> CartOutcome {
        let requested = item.quantity.max(1);
        let existing = self
            .state
            .get(item.product_id)
            .map(|line| (line.quantity, line.stock, line.price));
        let (current, stock, price) = existing.unwrap_or((0, item.stock, item.price));
        let wanted = current.saturating_add(requested);

        let outcome = if wanted > stock {
            CartOutcome::StockExceeded {
                requested: wanted,
                available: stock,
            }
        } else if self.state.total_with(item.product_id, price, wanted).is_none() {
            CartOutcome::TotalOverflow
        } else if let Some(line) = self.state.get_mut(item.product_id) {
            line.quantity = wanted;
            CartOutcome::Updated { quantity: wanted }
        } else {
            self.state.items.push(CartLineItem {
                quantity: wanted,
                ..item
            });
            CartOutcome::Added { quantity: wanted }
        };

        self.commit(outcome)
    }

    /// Remove a product's line. Unknown products are ignored.
    pub fn remove_from_cart(&mut self, product_id: ProductId) -> CartOutcome {
        let before = self.state.items.len();
        self.state
            .items
            .retain(|item| item.product_id != product_id);

        let outcome = if self.state.items.len() == before {
            CartOutcome::Unchanged
        } else {
            CartOutcome::Removed
        };
        self.commit(outcome)
    }

    /// Set a line's quantity. Zero removes the line; unknown products are
    /// ignored.
    pub fn update_quantity(&mut self, product_id: ProductId, quantity: u32) -> CartOutcome {
        if quantity == 0 {
            return self.remove_from_cart(product_id);
        }

        let fits = self
            .state
            .get(product_id)
            .is_some_and(|line| self.state.total_with(product_id, line.price, quantity).is_some());

        let outcome = match self.state.get_mut(product_id) {
            None => CartOutcome::Unchanged,
            Some(line) if quantity > line.stock => CartOutcome::StockExceeded {
                requested: quantity,
                available: line.stock,
            },
            Some(line) if line.quantity == quantity => CartOutcome::Unchanged,
            Some(_) if !fits => CartOutcome::TotalOverflow,
            Some(line) => {
                line.quantity = quantity;
                CartOutcome::Updated { quantity }
            }
        };
        self.commit(outcome)
    }

    /// Empty the cart. Clearing an empty cart is [`CartOutcome::Unchanged`].
    pub fn clear_cart(&mut self) -> CartOutcome {
        let outcome = if self.state.items.is_empty() {
            CartOutcome::Unchanged
        } else {
            self.state.items.clear();
            CartOutcome::Removed
        };
        self.commit(outcome)
    }

    /// Sum of all line quantities.
    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.state.total_items()
    }

    /// Sum of `price × quantity` over all lines.
    #[must_use]
    pub fn total_price(&self) -> Price {
        self.state.total_price()
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartLineItem] {
        &self.state.items
    }

    /// Line for a product, if present.
    #[must_use]
    pub fn get(&self, product_id: ProductId) -> Option<&CartLineItem> {
        self.state.get(product_id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &CartState {
        &self.state
    }

    /// Owned copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> CartState {
        self.state.clone()
    }

    /// Build a checkout request from a copy of the current items.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::EmptyCart`] if there is nothing to order.
    pub fn checkout_request(
        &self,
        contact: ContactDetails,
    ) -> Result<CheckoutRequest, CheckoutError> {
        CheckoutRequest::new(self.snapshot().items, contact)
    }

    /// Register an observer for future changes.
    pub fn subscribe(&mut self, observer: impl CartObserver + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Remove an observer. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sub, _)| *sub != id);
        self.observers.len() != before
    }

    fn commit(&mut self, outcome: CartOutcome) -> CartOutcome {
        if outcome.changed() {
            self.persist();
            self.notify();
        }
        outcome
    }

    fn persist(&self) {
        let blob = match serde_json::to_string(&self.state) {
            Ok(blob) => blob,
            Err(e) => {
                warn!(error = %e, "Failed to encode cart");
                return;
            }
        };
        if let Err(e) = self.storage.save(&blob) {
            warn!(error = %e, "Failed to persist cart");
        }
    }

    fn notify(&self) {
        for (_, observer) in &self.observers {
            observer.cart_changed(&self.state);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

    use super::*;

    fn item(id: i32, price: i64, stock: u32, quantity: u32) -> CartLineItem {
        CartLineItem {
            product_id: ProductId::new(id),
            name: format!("Produit {id}"),
            image: format!("{id}.png"),
            category: "Maison".to_owned(),
            price: Price::from(price),
            stock,
            quantity,
        }
    }

    fn store() -> (CartStore<MemoryStorage>, MemoryStorage) {
        let storage = MemoryStorage::new();
        (CartStore::load(storage.clone()), storage)
    }

    struct FailingStorage;

    impl CartStorage for FailingStorage {
        fn load(&self) -> Result<Option<String>, StorageError> {
            Err(StorageError::Backend("unavailable".to_owned()))
        }

        fn save(&self, _blob: &str) -> Result<(), StorageError> {
            Err(StorageError::Backend("read-only".to_owned()))
        }
    }

    #[test]
    fn test_add_update_remove_scenario() {
        let (mut cart, _) = store();

        assert_eq!(
            cart.add_to_cart(item(1, 1000, 5, 3)),
            CartOutcome::Added { quantity: 3 }
        );
        assert_eq!(cart.total_items(), 3);
        assert_eq!(cart.total_price(), Price::from(3000));

        assert_eq!(
            cart.update_quantity(ProductId::new(1), 10),
            CartOutcome::StockExceeded {
                requested: 10,
                available: 5
            }
        );
        assert_eq!(cart.get(ProductId::new(1)).unwrap().quantity, 3);

        assert_eq!(
            cart.update_quantity(ProductId::new(1), 0),
            CartOutcome::Removed
        );
        assert!(cart.is_empty());
        assert_eq!(cart.total_items(), 0);
    }

    #[test]
    fn test_add_existing_accumulates() {
        let (mut cart, _) = store();
        let _ = cart.add_to_cart(item(1, 200, 5, 2));
        assert_eq!(
            cart.add_to_cart(item(1, 200, 5, 3)),
            CartOutcome::Updated { quantity: 5 }
        );
        assert_eq!(cart.items().len(), 1);
        assert_eq!(
            cart.add_to_cart(item(1, 200, 5, 1)),
            CartOutcome::StockExceeded {
                requested: 6,
                available: 5
            }
        );
        assert_eq!(cart.get(ProductId::new(1)).unwrap().quantity, 5);
    }

    #[test]
    fn test_add_rejects_zero_stock_and_excess() {
        let (mut cart, storage) = store();
        assert_eq!(
            cart.add_to_cart(item(1, 200, 0, 1)),
            CartOutcome::StockExceeded {
                requested: 1,
                available: 0
            }
        );
        assert_eq!(
            cart.add_to_cart(item(2, 200, 2, 3)),
            CartOutcome::StockExceeded {
                requested: 3,
                available: 2
            }
        );
        assert!(cart.is_empty());
        assert!(storage.blob().is_none());
    }

    #[test]
    fn test_add_zero_quantity_counts_as_one() {
        let (mut cart, _) = store();
        assert_eq!(
            cart.add_to_cart(item(1, 200, 2, 0)),
            CartOutcome::Added { quantity: 1 }
        );
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let (mut cart, storage) = store();
        assert_eq!(
            cart.remove_from_cart(ProductId::new(99)),
            CartOutcome::Unchanged
        );
        assert_eq!(
            cart.update_quantity(ProductId::new(99), 2),
            CartOutcome::Unchanged
        );
        assert!(storage.blob().is_none());
    }

    #[test]
    fn test_clear_cart() {
        let (mut cart, storage) = store();
        let _ = cart.add_to_cart(item(1, 100, 5, 1));
        let _ = cart.add_to_cart(item(2, 300, 5, 2));
        assert_eq!(cart.clear_cart(), CartOutcome::Removed);
        assert!(cart.items().is_empty());
        assert_eq!(cart.total_items(), 0);
        assert_eq!(storage.blob().unwrap(), r#"{"items":[]}"#);
    }

    #[test]
    fn test_clearing_empty_cart_is_unchanged() {
        let (mut cart, storage) = store();
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        cart.subscribe(move |_: &CartState| {
            seen.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(cart.clear_cart(), CartOutcome::Unchanged);
        assert!(storage.blob().is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_huge_stored_price_does_not_break_totals() {
        let blob = r#"{"items":[
            {"productId":1,"name":"Casque","image":"","category":"Audio","price":"79228162514264337593543950335","stock":5,"quantity":2},
            {"productId":2,"name":"Micro","image":"","category":"Audio","price":"1500","stock":5,"quantity":1}
        ]}"#;
        let cart = CartStore::load(MemoryStorage::with_blob(blob));

        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.total_price(), Price::from(1500));
    }

    #[test]
    fn test_rejects_changes_that_overflow_total() {
        let (mut cart, storage) = store();
        let huge = CartLineItem {
            price: Price::new(rust_decimal::Decimal::MAX),
            ..item(1, 0, 5, 1)
        };

        assert_eq!(cart.add_to_cart(huge.clone()), CartOutcome::Added { quantity: 1 });
        assert_eq!(cart.add_to_cart(huge), CartOutcome::TotalOverflow);
        assert_eq!(
            cart.update_quantity(ProductId::new(1), 3),
            CartOutcome::TotalOverflow
        );
        assert_eq!(
            cart.add_to_cart(item(2, 1, 5, 1)),
            CartOutcome::TotalOverflow
        );

        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.get(ProductId::new(1)).unwrap().quantity, 1);
        assert_eq!(cart.total_price(), Price::new(rust_decimal::Decimal::MAX));
        let stored: CartState = serde_json::from_str(&storage.blob().unwrap()).unwrap();
        assert_eq!(stored.items.len(), 1);
    }

    #[test]
    fn test_quantities_stay_in_range_over_mixed_sequence() {
        let (mut cart, _) = store();
        let stocks = [3_u32, 1, 7];
        let mut step: u32 = 0;

        for round in 0..60_u32 {
            let idx = usize::try_from(round % 3).unwrap();
            let id = i32::try_from(idx).unwrap() + 1;
            let stock = stocks[idx];
            step = step.wrapping_mul(31).wrapping_add(round + 7) % 11;

            if round % 2 == 0 {
                let _ = cart.add_to_cart(item(id, 10, stock, step));
            } else {
                let _ = cart.update_quantity(ProductId::new(id), step);
            }

            for line in cart.items() {
                assert!(line.quantity >= 1, "zero quantity persisted");
                assert!(line.quantity <= line.stock, "quantity above stock");
            }
            let expected: Price = cart
                .items()
                .iter()
                .map(|l| l.price.times(l.quantity))
                .sum();
            assert_eq!(cart.total_price(), expected);
        }
    }

    #[test]
    fn test_state_survives_reload() {
        let (mut cart, storage) = store();
        let _ = cart.add_to_cart(item(2, 450, 4, 2));
        let _ = cart.add_to_cart(item(1, 1000, 5, 1));

        let reloaded = CartStore::load(storage.clone());
        assert_eq!(reloaded.state(), cart.state());
        let order: Vec<_> = reloaded
            .items()
            .iter()
            .map(|i| i.product_id.as_i32())
            .collect();
        assert_eq!(order, vec![2, 1]);
    }

    #[test]
    fn test_corrupt_storage_starts_empty() {
        let cart = CartStore::load(MemoryStorage::with_blob("{not json"));
        assert!(cart.is_empty());

        let cart = CartStore::load(MemoryStorage::with_blob(r#"{"other": 1}"#));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_failing_storage_never_errors() {
        let mut cart = CartStore::load(FailingStorage);
        assert_eq!(
            cart.add_to_cart(item(1, 100, 2, 2)),
            CartOutcome::Added { quantity: 2 }
        );
        assert_eq!(cart.total_items(), 2);
    }

    #[test]
    fn test_observers_see_each_change() {
        let (mut cart, storage) = store();
        let calls = Arc::new(AtomicUsize::new(0));
        let last_total = Arc::new(AtomicU64::new(0));

        let seen_calls = Arc::clone(&calls);
        let seen_total = Arc::clone(&last_total);
        let persisted = storage.clone();
        let id = cart.subscribe(move |state: &CartState| {
            seen_calls.fetch_add(1, Ordering::SeqCst);
            seen_total.store(state.total_items(), Ordering::SeqCst);
            // Persistence happens before notification.
            let stored: CartState = serde_json::from_str(&persisted.blob().unwrap()).unwrap();
            assert_eq!(&stored, state);
        });

        let _ = cart.add_to_cart(item(1, 100, 5, 2));
        let _ = cart.update_quantity(ProductId::new(1), 4);
        let _ = cart.update_quantity(ProductId::new(1), 9);
        let _ = cart.remove_from_cart(ProductId::new(42));

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(last_total.load(Ordering::SeqCst), 4);

        assert!(cart.unsubscribe(id));
        assert!(!cart.unsubscribe(id));
        let _ = cart.clear_cart();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_checkout_request_is_a_copy() {
        let (mut cart, _) = store();
        let _ = cart.add_to_cart(item(1, 1000, 5, 2));
        let contact = ContactDetails::new("Awa", "+221 77 000 00 00", "awa@gaspass.shop").unwrap();

        let request = cart.checkout_request(contact).unwrap();
        let _ = cart.clear_cart();

        assert_eq!(request.items.len(), 1);
        assert_eq!(request.total, Price::from(2000));
    }
}
