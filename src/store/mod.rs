//! Blob-store access.
//!
//! The inspector needs three primitives from a store: a metadata probe, a byte-range read and a
//! full read, with "not found" told apart from every other failure. [`ObjectStore`] captures
//! that contract; [`InMemoryStore`], [`LocalDirStore`] and [`HttpObjectStore`] implement it.

mod http;
mod local;
mod memory;

use thiserror::Error;
use unicode_normalization::UnicodeNormalization;

use crate::types::{ObjectLocation, ObjectMetadata};

pub use http::{HttpObjectStore, HttpStoreOptions};
pub use local::LocalDirStore;
pub use memory::InMemoryStore;

/// Convenience result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Error returned by [`ObjectStore`] implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The object (or bucket) does not exist.
    #[error("object not found: {bucket}/{key}")]
    NotFound { bucket: String, key: String },

    /// Local I/O failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Transport or HTTP status failure.
    #[error("remote error: {0}")]
    Remote(String),

    /// The location cannot be addressed by this store.
    #[error("invalid location: {0}")]
    InvalidLocation(String),
}

impl StoreError {
    pub fn not_found(location: &ObjectLocation) -> Self {
        Self::NotFound {
            bucket: location.bucket.clone(),
            key: location.key.clone(),
        }
    }
}

/// Read-only access to objects in a blob store.
///
/// Implementations must be shareable across threads; the inspector issues calls from whatever
/// thread invokes it and never mutates the store.
pub trait ObjectStore: Send + Sync {
    /// Size and content type, without reading content.
    fn head(&self, location: &ObjectLocation) -> StoreResult<ObjectMetadata>;

    /// Bytes `start..=end_inclusive`, clipped to the object length.
    fn get_range(
        &self,
        location: &ObjectLocation,
        start: u64,
        end_inclusive: u64,
    ) -> StoreResult<Vec<u8>>;

    /// The whole object.
    fn get(&self, location: &ObjectLocation) -> StoreResult<Vec<u8>>;
}

/// Canonical (NFC) form of an object key.
///
/// Keys typed on platforms that decompose accented characters (`e` + U+0301) and keys that
/// use the precomposed form (U+00E9) map to the same string.
pub fn normalize_key(key: &str) -> String {
    key.nfc().collect()
}

#[cfg(test)]
mod tests {
    use super::normalize_key;

    #[test]
    fn decomposed_and_composed_keys_match() {
        let composed = "relat\u{00F3}rio/pre\u{00E7}os.csv";
        let decomposed = "relato\u{0301}rio/prec\u{0327}os.csv";
        assert_ne!(composed, decomposed);
        assert_eq!(normalize_key(decomposed), composed);
        assert_eq!(normalize_key(composed), composed);
    }

    #[test]
    fn normalization_is_idempotent() {
        let once = normalize_key("cafe\u{0301}.xlsx");
        assert_eq!(normalize_key(&once), once);
    }
}
