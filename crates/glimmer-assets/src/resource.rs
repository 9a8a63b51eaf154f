use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::AssetError;

/// Resolves a logical resource name to its bytes.
pub trait ResourceLoader {
    fn read(&self, name: &str) -> Result<Vec<u8>, AssetError>;
}

/// Loads resources from disk, relative to a base directory.
#[derive(Debug, Clone)]
pub struct FileLoader {
    base_path: PathBuf,
}

impl FileLoader {
    /// Create a loader rooted at the given base path.
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        let base_path = base_path.into();
        info!("FileLoader created with base path: {}", base_path.display());
        Self { base_path }
    }

    /// Resolve a relative resource name against the base path.
    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_path.join(path)
        }
    }

    /// The base path this loader resolves relative names against.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

impl ResourceLoader for FileLoader {
    fn read(&self, name: &str) -> Result<Vec<u8>, AssetError> {
        let full_path = self.resolve(Path::new(name));

        if !full_path.exists() {
            return Err(AssetError::NotFound(full_path));
        }

        std::fs::read(&full_path).map_err(|e| AssetError::Io(full_path, e))
    }
}

/// Named in-memory resources, e.g. containers compiled into the binary.
#[derive(Debug, Clone, Default)]
pub struct MemoryLoader {
    resources: HashMap<String, Vec<u8>>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) a resource under `name`.
    pub fn insert(&mut self, name: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.resources.insert(name.into(), bytes.into());
    }

    pub fn with(mut self, name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.insert(name, bytes);
        self
    }
}

impl ResourceLoader for MemoryLoader {
    fn read(&self, name: &str) -> Result<Vec<u8>, AssetError> {
        self.resources
            .get(name)
            .cloned()
            .ok_or_else(|| AssetError::ResourceNotFound(name.to_string()))
    }
}
