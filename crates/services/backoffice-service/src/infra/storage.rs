//! File storage for product gallery images.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use common::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Storage collaborator for uploaded files.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait FileStorage: Send + Sync {
    /// Absolute location of a stored file name
    fn resolve(&self, file_name: &str) -> PathBuf;

    /// Delete the file at `path`
    async fn delete(&self, path: &Path) -> AppResult<()>;
}

/// Files kept under a local upload directory.
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl FileStorage for LocalStorage {
    fn resolve(&self, file_name: &str) -> PathBuf {
        // Stored names never address anything outside the root
        let name = Path::new(file_name)
            .file_name()
            .map(PathBuf::from)
            .unwrap_or_default();
        self.root.join(name)
    }

    async fn delete(&self, path: &Path) -> AppResult<()> {
        match tokio::fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(AppError::not_found(format!("File {}", path.display())))
            }
            Err(e) => Err(AppError::internal(format!(
                "Failed to delete {}: {}",
                path.display(),
                e
            ))),
        }
    }
}
