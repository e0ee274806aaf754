use crate::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Canonical JSON byte representation for payloads.
pub struct JsonSerializer;

impl JsonSerializer {
    pub fn to_bytes<T: Serialize>(payload: &T) -> Result<Vec<u8>> {
        serde_json::to_vec(payload).map_err(Error::Serialization)
    }

    pub fn from_bytes<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
        serde_json::from_slice(bytes).map_err(|e| Error::Deserialization {
            message: e.to_string(),
        })
    }
}
