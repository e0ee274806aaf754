pub mod fs;

pub use fs::FsBlobStore;

use crate::Result;
use async_trait::async_trait;

/// Seam to the blob store holding offloaded payloads.
///
/// Implementations must be safe for concurrent use by multiple callers;
/// the encoder holds a shared handle and performs no locking of its own.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Writes `bytes` to a freshly named object and returns its reference URI.
    async fn write(&self, bytes: &[u8]) -> Result<String>;

    /// Reads the object at `reference` back.
    ///
    /// Fails with [`crate::Error::BlobNotFound`] when the reference no
    /// longer resolves to a stored object.
    async fn read(&self, reference: &str) -> Result<Vec<u8>>;

    /// Removes the object at `reference` if it exists.
    ///
    /// Idempotent: returns `true` when an object was actually deleted and
    /// `false` when it was already absent. Only connectivity problems are
    /// errors.
    async fn delete(&self, reference: &str) -> Result<bool>;
}
