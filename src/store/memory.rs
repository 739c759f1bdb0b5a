use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use super::{ObjectStore, StoreError, StoreResult};
use crate::types::{ObjectLocation, ObjectMetadata};

#[derive(Debug, Clone)]
struct StoredObject {
    bytes: Vec<u8>,
    content_type: Option<String>,
}

/// Objects held in memory, keyed by exact bucket/key.
///
/// Useful for tests and for callers that already hold the bytes.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    objects: RwLock<HashMap<ObjectLocation, StoredObject>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an object.
    pub fn put(
        &self,
        bucket: impl Into<String>,
        key: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
        content_type: Option<&str>,
    ) {
        let location = ObjectLocation::new(bucket, key);
        let object = StoredObject {
            bytes: bytes.into(),
            content_type: content_type.map(str::to_string),
        };
        self.objects
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(location, object);
    }

    fn with_object<T>(
        &self,
        location: &ObjectLocation,
        f: impl FnOnce(&StoredObject) -> T,
    ) -> StoreResult<T> {
        let objects = self
            .objects
            .read()
            .map_err(|_| StoreError::Remote("in-memory store lock poisoned".to_string()))?;
        objects
            .get(location)
            .map(f)
            .ok_or_else(|| StoreError::not_found(location))
    }
}

impl ObjectStore for InMemoryStore {
    fn head(&self, location: &ObjectLocation) -> StoreResult<ObjectMetadata> {
        self.with_object(location, |o| ObjectMetadata {
            size_bytes: o.bytes.len() as u64,
            content_type: o.content_type.clone(),
        })
    }

    fn get_range(
        &self,
        location: &ObjectLocation,
        start: u64,
        end_inclusive: u64,
    ) -> StoreResult<Vec<u8>> {
        self.with_object(location, |o| {
            let len = o.bytes.len();
            let start = usize::try_from(start).unwrap_or(usize::MAX).min(len);
            let end = usize::try_from(end_inclusive)
                .unwrap_or(usize::MAX)
                .saturating_add(1)
                .min(len);
            if start >= end {
                Vec::new()
            } else {
                o.bytes[start..end].to_vec()
            }
        })
    }

    fn get(&self, location: &ObjectLocation) -> StoreResult<Vec<u8>> {
        self.with_object(location, |o| o.bytes.clone())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, PoisonError};

    use super::InMemoryStore;
    use crate::store::{ObjectStore, StoreError};
    use crate::types::ObjectLocation;

    #[test]
    fn range_reads_are_clipped() {
        let store = InMemoryStore::new();
        store.put("b", "k", b"0123456789".to_vec(), Some("text/csv"));
        let loc = ObjectLocation::new("b", "k");

        assert_eq!(store.get_range(&loc, 0, 3).unwrap(), b"0123");
        assert_eq!(store.get_range(&loc, 8, 8191).unwrap(), b"89");
        assert!(store.get_range(&loc, 20, 30).unwrap().is_empty());

        let meta = store.head(&loc).unwrap();
        assert_eq!(meta.size_bytes, 10);
        assert_eq!(meta.content_type.as_deref(), Some("text/csv"));
    }

    #[test]
    fn put_survives_poisoned_lock() {
        let store = Arc::new(InMemoryStore::new());
        let poisoner = Arc::clone(&store);
        let _ = std::thread::spawn::<_, ()>(move || {
            let _guard = poisoner.objects.write().unwrap();
            panic!("poison the lock");
        })
        .join();
        assert!(store.objects.is_poisoned());

        store.put("b", "k", b"a;b\n".to_vec(), None);
        let objects = store.objects.read().unwrap_or_else(PoisonError::into_inner);
        assert!(objects.contains_key(&ObjectLocation::new("b", "k")));
    }

    #[test]
    fn missing_object_is_not_found() {
        let store = InMemoryStore::new();
        let err = store.head(&ObjectLocation::new("b", "nope")).unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }
}
