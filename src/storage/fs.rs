//! Local-filesystem blob store.
//!
//! Stores each offloaded payload as a `.dat` file under a container
//! directory and hands out `file://` references. Object names combine the
//! configured base name with a fresh UUID so that no two writes collide.
//!
//! # Example
//!
//! ```rust,no_run
//! use kafka_claimcheck::storage::{BlobStore, FsBlobStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = FsBlobStore::new("/var/lib/claimcheck/payloads", "payload");
//!
//!     let reference = store.write(b"{\"id\":1}").await?;
//!     let bytes = store.read(&reference).await?;
//!     assert_eq!(bytes, b"{\"id\":1}");
//!
//!     let deleted = store.delete(&reference).await?;
//!     assert!(deleted);
//!     Ok(())
//! }
//! ```

use super::BlobStore;
use crate::{Error, Result};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};
use uuid::Uuid;

const FILE_URI_SCHEME: &str = "file://";

/// Blob store backed by a local directory.
pub struct FsBlobStore {
    container: PathBuf,
    base_name: String,
}

impl FsBlobStore {
    /// Creates a store rooted at the given container directory.
    ///
    /// The directory is created lazily on the first write.
    pub fn new(container: impl AsRef<Path>, base_name: impl Into<String>) -> Self {
        Self {
            container: container.as_ref().to_path_buf(),
            base_name: base_name.into(),
        }
    }

    /// Mints a fresh object name: `<base>_<uuid>.dat`.
    fn object_name(&self) -> String {
        format!("{}_{}.dat", self.base_name, Uuid::new_v4())
    }

    fn path_for(&self, reference: &str) -> PathBuf {
        PathBuf::from(reference.strip_prefix(FILE_URI_SCHEME).unwrap_or(reference))
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn write(&self, bytes: &[u8]) -> Result<String> {
        fs::create_dir_all(&self.container)
            .await
            .map_err(|e| Error::StorageUnavailable(format!("container unavailable: {}", e)))?;

        let path = self.container.join(self.object_name());
        fs::write(&path, bytes)
            .await
            .map_err(|e| Error::StorageUnavailable(format!("write failed: {}", e)))?;

        let reference = format!("{}{}", FILE_URI_SCHEME, path.display());
        info!(reference = %reference, bytes = bytes.len(), "Payload written to blob store");
        Ok(reference)
    }

    async fn read(&self, reference: &str) -> Result<Vec<u8>> {
        let path = self.path_for(reference);
        match fs::read(&path).await {
            Ok(bytes) => {
                debug!(reference = %reference, bytes = bytes.len(), "Payload read from blob store");
                Ok(bytes)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Err(Error::BlobNotFound {
                reference: reference.to_string(),
            }),
            Err(e) => Err(Error::StorageUnavailable(format!("read failed: {}", e))),
        }
    }

    async fn delete(&self, reference: &str) -> Result<bool> {
        let path = self.path_for(reference);
        match fs::remove_file(&path).await {
            Ok(()) => {
                info!(reference = %reference, "Payload deleted from blob store");
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(reference = %reference, "Payload already absent, nothing to delete");
                Ok(false)
            }
            Err(e) => Err(Error::StorageUnavailable(format!("delete failed: {}", e))),
        }
    }
}
