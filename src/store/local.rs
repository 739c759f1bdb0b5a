use std::fs::File;
use std::io::{ErrorKind, Read, Seek, SeekFrom};
use std::path::{Component, Path, PathBuf};

use super::{ObjectStore, StoreError, StoreResult};
use crate::types::{ObjectLocation, ObjectMetadata};

/// Objects stored as files: `<root>/<bucket>/<key>`.
///
/// Keys are `/`-separated; any `..`, root or prefix component is rejected.
#[derive(Debug, Clone)]
pub struct LocalDirStore {
    root: PathBuf,
}

impl LocalDirStore {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    fn resolve(&self, location: &ObjectLocation) -> StoreResult<PathBuf> {
        let mut path = self.root.join(checked_segment(&location.bucket)?);
        for segment in location.key.split('/').filter(|s| !s.is_empty()) {
            path.push(checked_segment(segment)?);
        }
        Ok(path)
    }

    fn open(&self, location: &ObjectLocation) -> StoreResult<File> {
        let path = self.resolve(location)?;
        File::open(&path).map_err(|e| map_io(e, location))
    }
}

fn checked_segment(segment: &str) -> StoreResult<&str> {
    let mut components = Path::new(segment).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(segment),
        _ => Err(StoreError::InvalidLocation(format!(
            "path segment '{segment}' is not allowed"
        ))),
    }
}

fn map_io(err: std::io::Error, location: &ObjectLocation) -> StoreError {
    if err.kind() == ErrorKind::NotFound {
        StoreError::not_found(location)
    } else {
        StoreError::Io(err)
    }
}

impl ObjectStore for LocalDirStore {
    fn head(&self, location: &ObjectLocation) -> StoreResult<ObjectMetadata> {
        let path = self.resolve(location)?;
        let meta = std::fs::metadata(&path).map_err(|e| map_io(e, location))?;
        if !meta.is_file() {
            return Err(StoreError::not_found(location));
        }
        Ok(ObjectMetadata {
            size_bytes: meta.len(),
            content_type: None,
        })
    }

    fn get_range(
        &self,
        location: &ObjectLocation,
        start: u64,
        end_inclusive: u64,
    ) -> StoreResult<Vec<u8>> {
        let mut file = self.open(location)?;
        file.seek(SeekFrom::Start(start))?;
        let len = end_inclusive.saturating_sub(start).saturating_add(1);
        let mut out = Vec::new();
        file.take(len).read_to_end(&mut out)?;
        Ok(out)
    }

    fn get(&self, location: &ObjectLocation) -> StoreResult<Vec<u8>> {
        let mut file = self.open(location)?;
        let mut out = Vec::new();
        file.read_to_end(&mut out)?;
        Ok(out)
    }
}
