#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use tabular_inspector::store::{InMemoryStore, ObjectStore, StoreError, StoreResult};
use tabular_inspector::types::{ObjectLocation, ObjectMetadata};

pub const BUCKET: &str = "imports";

/// Wraps a store and counts calls per primitive.
pub struct CountingStore {
    inner: Arc<dyn ObjectStore>,
    pub heads: AtomicUsize,
    pub ranges: AtomicUsize,
    pub gets: AtomicUsize,
    pub range_bytes: AtomicUsize,
}

impl CountingStore {
    pub fn new(inner: Arc<dyn ObjectStore>) -> Self {
        Self {
            inner,
            heads: AtomicUsize::new(0),
            ranges: AtomicUsize::new(0),
            gets: AtomicUsize::new(0),
            range_bytes: AtomicUsize::new(0),
        }
    }

    pub fn bulk_reads(&self) -> usize {
        self.ranges.load(Ordering::SeqCst) + self.gets.load(Ordering::SeqCst)
    }
}

impl ObjectStore for CountingStore {
    fn head(&self, location: &ObjectLocation) -> StoreResult<ObjectMetadata> {
        self.heads.fetch_add(1, Ordering::SeqCst);
        self.inner.head(location)
    }

    fn get_range(
        &self,
        location: &ObjectLocation,
        start: u64,
        end_inclusive: u64,
    ) -> StoreResult<Vec<u8>> {
        self.ranges.fetch_add(1, Ordering::SeqCst);
        let out = self.inner.get_range(location, start, end_inclusive)?;
        self.range_bytes.fetch_add(out.len(), Ordering::SeqCst);
        Ok(out)
    }

    fn get(&self, location: &ObjectLocation) -> StoreResult<Vec<u8>> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.inner.get(location)
    }
}

/// Which primitive of [`BrokenStore`] misbehaves.
#[derive(Debug, Clone, Copy)]
pub enum Breakage {
    HeadFails,
    RangeFails,
    RangePanics,
}

/// Reports a 20 000 byte CSV object but fails in the configured way.
pub struct BrokenStore(pub Breakage);

impl ObjectStore for BrokenStore {
    fn head(&self, _location: &ObjectLocation) -> StoreResult<ObjectMetadata> {
        match self.0 {
            Breakage::HeadFails => Err(StoreError::Remote("HTTP 503 Service Unavailable".into())),
            _ => Ok(ObjectMetadata {
                size_bytes: 20_000,
                content_type: Some("text/csv".into()),
            }),
        }
    }

    fn get_range(&self, _location: &ObjectLocation, _start: u64, _end: u64) -> StoreResult<Vec<u8>> {
        match self.0 {
            Breakage::RangePanics => panic!("range reader exploded"),
            _ => Err(StoreError::Remote("connection reset".into())),
        }
    }

    fn get(&self, _location: &ObjectLocation) -> StoreResult<Vec<u8>> {
        Err(StoreError::Remote("connection reset".into()))
    }
}

pub fn memory_store_with(key: &str, bytes: impl Into<Vec<u8>>, content_type: Option<&str>) -> Arc<InMemoryStore> {
    let store = Arc::new(InMemoryStore::new());
    store.put(BUCKET, key, bytes, content_type);
    store
}

/// Semicolon-separated inventory export of exactly `target_len` bytes.
pub fn inventory_csv(target_len: usize) -> String {
    let mut out = String::from("codigo;descricao;quantidade;preco\n");
    let mut i = 0usize;
    loop {
        let row = format!("P{i:05};Produto {i};{};{},{:02}\n", i % 50 + 1, i % 90 + 1, i % 100);
        if out.len() + row.len() + 40 > target_len {
            break;
        }
        out.push_str(&row);
        i += 1;
    }
    // Pad the last row's description to land exactly on the target length.
    let prefix = "Z99999;";
    let suffix = ";1;1,00\n";
    let pad = target_len - out.len() - prefix.len() - suffix.len();
    out.push_str(prefix);
    out.push_str(&"x".repeat(pad));
    out.push_str(suffix);
    assert_eq!(out.len(), target_len);
    out
}

pub fn tmp_path(name: &str, ext: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("tabular-inspector-{name}-{nanos}.{ext}"))
}
