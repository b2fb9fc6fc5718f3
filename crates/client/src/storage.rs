//! File-backed cart storage.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use gaspass_core::cart::{CartStorage, StorageError};

/// Persists the cart blob in a single JSON file.
///
/// Writes go to a sibling temporary file that is then renamed over the
/// target, so a crash mid-write leaves the previous cart intact.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    /// Storage at `path`. Nothing is touched until the first load or save.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The cart file location.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl CartStorage for FileStorage {
    fn load(&self) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(blob) => Ok(Some(blob)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, blob: &str) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let temp = self.temp_path();
        let mut file = fs::File::create(&temp)?;
        file.write_all(blob.as_bytes())?;
        file.sync_all()?;
        drop(file);

        fs::rename(&temp, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use gaspass_core::cart::{CartLineItem, CartStore};
    use gaspass_core::{Price, ProductId};
    use tempfile::TempDir;

    use super::*;

    fn item(id: i32, stock: u32) -> CartLineItem {
        CartLineItem {
            product_id: ProductId::new(id),
            name: format!("Produit {id}"),
            image: format!("produit-{id}.png"),
            category: "Audio".to_string(),
            price: Price::from(2500),
            stock,
            quantity: 1,
        }
    }

    #[test]
    fn test_missing_file_loads_none() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::new(dir.path().join("cart.json"));
        assert!(storage.load().unwrap().is_none());
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("gaspass").join("cart.json");
        let storage = FileStorage::new(&path);

        storage.save(r#"{"items":[]}"#).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), r#"{"items":[]}"#);
        assert!(!storage.temp_path().exists());
    }

    #[test]
    fn test_cart_survives_restart() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cart.json");

        let mut store = CartStore::load(FileStorage::new(&path));
        let _ = store.add_to_cart(item(1, 5));
        let _ = store.add_to_cart(item(2, 3));
        let _ = store.update_quantity(ProductId::new(2), 3);
        let before = store.snapshot();
        drop(store);

        let reloaded = CartStore::load(FileStorage::new(&path));
        assert_eq!(reloaded.snapshot(), before);
        assert_eq!(reloaded.total_items(), 4);
        assert_eq!(reloaded.total_price(), Price::from(10_000));
    }

    #[test]
    fn test_corrupt_file_starts_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cart.json");
        fs::write(&path, "{not json").unwrap();

        let store = CartStore::load(FileStorage::new(&path));
        assert!(store.is_empty());
    }

    #[test]
    fn test_unreadable_path_is_an_error() {
        let dir = TempDir::new().unwrap();
        // A directory where the file should be
        let storage = FileStorage::new(dir.path());
        assert!(storage.load().is_err());
    }
}
