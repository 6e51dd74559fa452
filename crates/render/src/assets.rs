//! Bundled asset sources
//!
//! Decoders pull raw bytes through an [`AssetSource`], which maps a resource
//! identifier to the bundled file content.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::error::{DecodeError, DecodeResult};

/// Resolves resource identifiers to raw asset bytes
pub trait AssetSource: Send + Sync {
    /// Load the bytes registered under `id`, or `Ok(None)` if there are none
    fn load(&self, id: u32) -> DecodeResult<Option<Arc<[u8]>>>;
}

impl<A: AssetSource + ?Sized> AssetSource for Arc<A> {
    fn load(&self, id: u32) -> DecodeResult<Option<Arc<[u8]>>> {
        (**self).load(id)
    }
}

/// Assets held in memory, e.g. from `include_bytes!`
#[derive(Debug, Clone, Default)]
pub struct MemoryAssets {
    assets: HashMap<u32, Arc<[u8]>>,
}

impl MemoryAssets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an asset, replacing any previous one with the same id
    pub fn insert(&mut self, id: u32, bytes: impl Into<Arc<[u8]>>) {
        self.assets.insert(id, bytes.into());
    }

    /// Builder form of [`insert`](Self::insert)
    pub fn with_asset(mut self, id: u32, bytes: impl Into<Arc<[u8]>>) -> Self {
        self.insert(id, bytes);
        self
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

impl AssetSource for MemoryAssets {
    fn load(&self, id: u32) -> DecodeResult<Option<Arc<[u8]>>> {
        Ok(self.assets.get(&id).cloned())
    }
}

/// Assets read from files under a root directory
///
/// Each identifier is registered against a path relative to the root. A
/// registered file that has disappeared is reported as absent.
#[derive(Debug, Clone)]
pub struct DirectoryAssets {
    root: PathBuf,
    files: HashMap<u32, PathBuf>,
}

impl DirectoryAssets {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            files: HashMap::new(),
        }
    }

    /// Map `id` to `relative_path` under the root
    pub fn register(&mut self, id: u32, relative_path: impl AsRef<Path>) {
        self.files.insert(id, relative_path.as_ref().to_path_buf());
    }

    /// Builder form of [`register`](Self::register)
    pub fn with_file(mut self, id: u32, relative_path: impl AsRef<Path>) -> Self {
        self.register(id, relative_path);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Full path registered for `id`
    pub fn path_of(&self, id: u32) -> Option<PathBuf> {
        self.files.get(&id).map(|relative| self.root.join(relative))
    }
}

impl AssetSource for DirectoryAssets {
    fn load(&self, id: u32) -> DecodeResult<Option<Arc<[u8]>>> {
        let Some(path) = self.path_of(id) else {
            return Ok(None);
        };

        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes.into())),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(id, path = %path.display(), "registered asset missing on disk");
                Ok(None)
            }
            Err(source) => Err(DecodeError::Io { id, source }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_assets() {
        let assets = MemoryAssets::new().with_asset(1, b"abc".to_vec());

        assert_eq!(assets.len(), 1);
        assert_eq!(assets.load(1).unwrap().as_deref(), Some(&b"abc"[..]));
        assert!(assets.load(2).unwrap().is_none());
    }

    #[test]
    fn test_directory_assets() {
        let temp = tempfile::tempdir().expect("temp dir should be created");
        fs::write(temp.path().join("icon.svg"), "<svg/>").unwrap();

        let assets = DirectoryAssets::new(temp.path())
            .with_file(1, "icon.svg")
            .with_file(2, "missing.svg");

        assert_eq!(assets.load(1).unwrap().as_deref(), Some(&b"<svg/>"[..]));
        // Registered but absent on disk
        assert!(assets.load(2).unwrap().is_none());
        // Never registered
        assert!(assets.load(3).unwrap().is_none());
    }

    #[test]
    fn test_shared_source() {
        let assets: Arc<dyn AssetSource> = Arc::new(MemoryAssets::new().with_asset(5, vec![1u8]));
        assert!(assets.load(5).unwrap().is_some());
    }
}
