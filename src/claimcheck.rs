//! The claim-check encoder: decides inline-vs-offload and shapes the
//! outgoing record.
//!
//! A payload whose serialized size exceeds the configured maximum is
//! written to the blob store and replaced in the record by its reference
//! URI; smaller payloads travel inline. Either way the record carries the
//! `isLargePayload` header telling the consumer which case it got, and the
//! correlation id header when the caller supplied one.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use kafka_claimcheck::claimcheck::ClaimCheckEncoder;
//! use kafka_claimcheck::storage::FsBlobStore;
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(FsBlobStore::new("/var/lib/claimcheck/payloads", "payload"));
//!     let encoder = ClaimCheckEncoder::new(store, 1024);
//!
//!     let record = encoder
//!         .encode("events", &json!({"id": 1}), Some("abc-123"))
//!         .await?;
//!     assert!(!record.is_large_payload());
//!     Ok(())
//! }
//! ```

use crate::record::{
    OutgoingRecord, RecordValue, CORRELATION_ID_HEADER, LARGE_PAYLOAD_HEADER, LARGE_PAYLOAD_NO,
    LARGE_PAYLOAD_YES,
};
use crate::serializer::JsonSerializer;
use crate::sizer::PayloadSizer;
use crate::storage::BlobStore;
use crate::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

/// Encodes payloads into outgoing records, offloading large ones to the
/// blob store.
///
/// Cheap to clone; clones share the underlying store handle.
#[derive(Clone)]
pub struct ClaimCheckEncoder {
    store: Arc<dyn BlobStore>,
    max_bytes: usize,
}

impl ClaimCheckEncoder {
    /// Creates an encoder over the given store with the given inline size
    /// threshold in bytes.
    pub fn new(store: Arc<dyn BlobStore>, max_bytes: usize) -> Self {
        Self { store, max_bytes }
    }

    /// Produces the outgoing record for `payload` on `topic`.
    ///
    /// Performs at most one blob write. The returned record's
    /// `isLargePayload` header is always consistent with the value variant,
    /// and the correlation header is attached iff `correlation_id` is
    /// present. The input payload is never mutated.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Serialization`] when the payload cannot be
    /// converted to bytes, and [`Error::StorageUnavailable`] when the blob
    /// write cannot complete. Neither is retried here.
    pub async fn encode<T: Serialize>(
        &self,
        topic: &str,
        payload: &T,
        correlation_id: Option<&str>,
    ) -> Result<OutgoingRecord> {
        let size = PayloadSizer::size_of(payload)?;
        debug!(topic = %topic, size, max_bytes = self.max_bytes, "Measured payload");

        let (value, flag) = if size > self.max_bytes {
            info!(topic = %topic, size, "Payload exceeds max configured size, offloading");
            let bytes = JsonSerializer::to_bytes(payload)?;
            let reference = self.store.write(&bytes).await?;
            (RecordValue::Reference(reference), LARGE_PAYLOAD_YES)
        } else {
            let bytes = JsonSerializer::to_bytes(payload)?;
            (RecordValue::Inline(bytes.into()), LARGE_PAYLOAD_NO)
        };

        let mut record = OutgoingRecord::new(topic, value);
        record.add_header(LARGE_PAYLOAD_HEADER, flag.as_bytes());
        if let Some(id) = correlation_id {
            record.add_header(CORRELATION_ID_HEADER, id.as_bytes());
        }
        Ok(record)
    }

    /// Recovers the payload from a record value and its `isLargePayload`
    /// header, reading the blob store when the payload was offloaded.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BlobNotFound`] when an offloaded payload's blob no
    /// longer exists, and [`Error::Deserialization`] when the bytes cannot
    /// be read back as `T` or the header does not match the value variant.
    pub async fn decode<T: DeserializeOwned>(
        &self,
        value: &RecordValue,
        is_large_payload: &str,
    ) -> Result<T> {
        match (is_large_payload, value) {
            (LARGE_PAYLOAD_NO, RecordValue::Inline(bytes)) => JsonSerializer::from_bytes(bytes),
            (LARGE_PAYLOAD_YES, RecordValue::Reference(reference)) => {
                let bytes = self.store.read(reference).await?;
                JsonSerializer::from_bytes(&bytes)
            }
            (LARGE_PAYLOAD_NO, RecordValue::Reference(_))
            | (LARGE_PAYLOAD_YES, RecordValue::Inline(_)) => Err(Error::Deserialization {
                message: format!(
                    "record value does not match {} header value {:?}",
                    LARGE_PAYLOAD_HEADER, is_large_payload
                ),
            }),
            (other, _) => Err(Error::Deserialization {
                message: format!(
                    "unrecognized {} header value {:?}",
                    LARGE_PAYLOAD_HEADER, other
                ),
            }),
        }
    }

    /// Removes the blob object behind `reference` if it still exists.
    ///
    /// Idempotent; returns whether an object was actually deleted.
    pub async fn delete(&self, reference: &str) -> Result<bool> {
        self.store.delete(reference).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::FsBlobStore;
    use serde_json::{json, Value};
    use tempfile::TempDir;

    fn encoder_with_store(max_bytes: usize) -> (ClaimCheckEncoder, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = Arc::new(FsBlobStore::new(temp_dir.path().join("payloads"), "payload"));
        (ClaimCheckEncoder::new(store, max_bytes), temp_dir)
    }

    fn blob_count(temp_dir: &TempDir) -> usize {
        match std::fs::read_dir(temp_dir.path().join("payloads")) {
            Ok(entries) => entries.count(),
            Err(_) => 0,
        }
    }

    #[tokio::test]
    async fn test_small_payload_stays_inline() {
        let (encoder, temp_dir) = encoder_with_store(1024);
        let payload = json!({"id": 1, "name": "small"});

        let record = encoder.encode("events", &payload, None).await.unwrap();

        assert_eq!(
            record.value,
            RecordValue::Inline(serde_json::to_vec(&payload).unwrap().into())
        );
        assert_eq!(record.header_str(LARGE_PAYLOAD_HEADER), Some("NO"));
        assert_eq!(blob_count(&temp_dir), 0);
    }

    #[tokio::test]
    async fn test_large_payload_is_offloaded_once() {
        let (encoder, temp_dir) = encoder_with_store(1024);
        let payload = json!({"body": "x".repeat(2048)});

        let record = encoder.encode("events", &payload, None).await.unwrap();

        assert!(record.value.is_reference());
        assert_eq!(record.header_str(LARGE_PAYLOAD_HEADER), Some("YES"));
        assert_eq!(blob_count(&temp_dir), 1);
    }

    #[tokio::test]
    async fn test_large_payload_round_trip() {
        let (encoder, _temp_dir) = encoder_with_store(1024);
        let payload = json!({"body": "x".repeat(2048), "seq": 7});

        let record = encoder.encode("events", &payload, None).await.unwrap();
        let decoded: Value = encoder.decode(&record.value, "YES").await.unwrap();

        assert_eq!(decoded, payload);
    }

    #[tokio::test]
    async fn test_correlation_header_present_iff_supplied() {
        let (encoder, _temp_dir) = encoder_with_store(1024);
        let payload = json!({"id": 1});

        let record = encoder
            .encode("events", &payload, Some("abc-123"))
            .await
            .unwrap();
        assert_eq!(record.header_str(CORRELATION_ID_HEADER), Some("abc-123"));
        assert_eq!(record.header_count(), 2);

        let record = encoder.encode("events", &payload, None).await.unwrap();
        assert_eq!(record.header(CORRELATION_ID_HEADER), None);
        assert_eq!(record.header_count(), 1);
    }

    #[tokio::test]
    async fn test_threshold_boundary_is_strictly_greater() {
        let payload = json!({"id": 12345});
        let exact = PayloadSizer::size_of(&payload).unwrap();

        // Size equal to the threshold stays inline; one byte less offloads.
        let (encoder, _t) = encoder_with_store(exact);
        let record = encoder.encode("events", &payload, None).await.unwrap();
        assert_eq!(record.header_str(LARGE_PAYLOAD_HEADER), Some("NO"));

        let (encoder, _t) = encoder_with_store(exact - 1);
        let record = encoder.encode("events", &payload, None).await.unwrap();
        assert_eq!(record.header_str(LARGE_PAYLOAD_HEADER), Some("YES"));
    }

    #[tokio::test]
    async fn test_decode_inline_payload() {
        let (encoder, _temp_dir) = encoder_with_store(1024);
        let payload = json!({"id": 42});

        let record = encoder.encode("events", &payload, None).await.unwrap();
        let decoded: Value = encoder.decode(&record.value, "NO").await.unwrap();
        assert_eq!(decoded, payload);
    }

    #[tokio::test]
    async fn test_decode_rejects_mismatched_header() {
        let (encoder, _temp_dir) = encoder_with_store(1024);
        let value = RecordValue::Inline(b"{}".to_vec().into());

        let result: Result<Value> = encoder.decode(&value, "YES").await;
        assert!(matches!(result, Err(Error::Deserialization { .. })));

        let result: Result<Value> = encoder.decode(&value, "MAYBE").await;
        assert!(matches!(result, Err(Error::Deserialization { .. })));
    }

    #[tokio::test]
    async fn test_decode_missing_blob_is_blob_not_found() {
        let (encoder, temp_dir) = encoder_with_store(16);
        let payload = json!({"body": "x".repeat(64)});

        let record = encoder.encode("events", &payload, None).await.unwrap();
        let reference = match &record.value {
            RecordValue::Reference(uri) => uri.clone(),
            other => panic!("expected reference, got {:?}", other),
        };

        assert!(encoder.delete(&reference).await.unwrap());
        drop(temp_dir);

        let result: Result<Value> = encoder.decode(&record.value, "YES").await;
        assert!(matches!(result, Err(Error::BlobNotFound { .. })));
    }
}
