//! Byte storage the codec reads images from and writes cards to.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Somewhere images can be read from and written to by URI.
pub trait CardStorage {
    /// Read the whole object at `uri`.
    fn read(&self, uri: &str) -> io::Result<Vec<u8>>;

    /// Replace the object at `uri` with `bytes`.
    fn write(&self, uri: &str, bytes: &[u8]) -> io::Result<()>;
}

/// Local filesystem storage.
///
/// URIs are plain paths or `file://` URLs. Relative paths resolve against
/// the root directory when one is set.
#[derive(Debug, Clone, Default)]
pub struct FsStorage {
    root: Option<PathBuf>,
}

impl FsStorage {
    /// Storage resolving relative paths against the working directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage resolving relative paths against `root`.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    /// Resolve a URI to a filesystem path.
    pub fn resolve(&self, uri: &str) -> PathBuf {
        let path = Path::new(uri.strip_prefix("file://").unwrap_or(uri));
        match &self.root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path.to_path_buf(),
        }
    }
}

impl CardStorage for FsStorage {
    fn read(&self, uri: &str) -> io::Result<Vec<u8>> {
        fs::read(self.resolve(uri))
    }

    fn write(&self, uri: &str, bytes: &[u8]) -> io::Result<()> {
        fs::write(self.resolve(uri), bytes)
    }
}
