//! Persistence seam for the cart store.
//!
//! Storage deals in the raw JSON blob; encoding, decoding and recovery from
//! corrupt data are the store's job.

use std::sync::{Arc, Mutex};

use thiserror::Error;

/// Errors raised by a [`CartStorage`] backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem error.
    #[error("cart storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Backend-specific failure.
    #[error("cart storage error: {0}")]
    Backend(String),
}

/// Durable location for the serialized cart.
pub trait CartStorage {
    /// Read the stored blob. `Ok(None)` means nothing has been stored yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn load(&self) -> Result<Option<String>, StorageError>;

    /// Replace the stored blob.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn save(&self, blob: &str) -> Result<(), StorageError>;
}

impl<S: CartStorage + ?Sized> CartStorage for &S {
    fn load(&self) -> Result<Option<String>, StorageError> {
        (**self).load()
    }

    fn save(&self, blob: &str) -> Result<(), StorageError> {
        (**self).save(blob)
    }
}

/// In-memory storage.
///
/// Clones share the same slot, so a test can keep a handle and inspect what
/// the store wrote, or hand it to a second store to simulate a reload.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slot: Arc<Mutex<Option<String>>>,
}

impl MemoryStorage {
    /// Create empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create storage pre-filled with a blob.
    #[must_use]
    pub fn with_blob(blob: impl Into<String>) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(blob.into()))),
        }
    }

    /// Current stored blob, if any.
    #[must_use]
    pub fn blob(&self) -> Option<String> {
        self.slot.lock().ok().and_then(|slot| slot.clone())
    }
}

impl CartStorage for MemoryStorage {
    fn load(&self) -> Result<Option<String>, StorageError> {
        let slot = self
            .slot
            .lock()
            .map_err(|e| StorageError::Backend(e.to_string()))?;
        Ok(slot.clone())
    }

    fn save(&self, blob: &str) -> Result<(), StorageError> {
        let mut slot = self
            .slot
            .lock()
            .map_err(|e| StorageError::Backend(e.to_string()))?;
        *slot = Some(blob.to_owned());
        Ok(())
    }
}
