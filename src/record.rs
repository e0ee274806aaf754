//! The outgoing record model shared by the encoder, the publish pipeline,
//! and the broker seam.
//!
//! A record carries either the serialized payload itself or a claim-check
//! reference to a blob object, and an ordered header list. The
//! [`LARGE_PAYLOAD_HEADER`] header is always present and tells the consumer
//! which of the two it got.

use bytes::Bytes;

/// Header marking whether the record value is a claim-check reference.
/// Always present, always `"YES"` or `"NO"`.
pub const LARGE_PAYLOAD_HEADER: &str = "isLargePayload";

/// Optional header carrying the caller-supplied correlation id.
pub const CORRELATION_ID_HEADER: &str = "X-DOCBROKER-Correlation-ID";

/// Value of [`LARGE_PAYLOAD_HEADER`] when the payload was offloaded.
pub const LARGE_PAYLOAD_YES: &str = "YES";

/// Value of [`LARGE_PAYLOAD_HEADER`] when the payload travels inline.
pub const LARGE_PAYLOAD_NO: &str = "NO";

/// The value of an outgoing record: either the payload's serialized bytes,
/// or the URI of the blob object holding them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordValue {
    /// Serialized payload carried inline in the record.
    Inline(Bytes),
    /// Claim-check reference to an offloaded payload.
    Reference(String),
}

impl RecordValue {
    /// The bytes that go on the wire: the inline payload, or the UTF-8
    /// bytes of the reference URI.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            RecordValue::Inline(bytes) => bytes,
            RecordValue::Reference(uri) => uri.as_bytes(),
        }
    }

    /// Whether this value is a claim-check reference.
    pub fn is_reference(&self) -> bool {
        matches!(self, RecordValue::Reference(_))
    }
}

/// A record ready to be handed to the broker client.
///
/// Headers preserve insertion order and allow duplicate names, matching
/// Kafka header semantics.
#[derive(Debug, Clone)]
pub struct OutgoingRecord {
    pub topic: String,
    pub key: Option<String>,
    pub value: RecordValue,
    headers: Vec<(String, Vec<u8>)>,
}

impl OutgoingRecord {
    pub fn new(topic: impl Into<String>, value: RecordValue) -> Self {
        Self {
            topic: topic.into(),
            key: None,
            value,
            headers: Vec::new(),
        }
    }

    /// Appends a header. Duplicate names are kept, in insertion order.
    pub fn add_header(&mut self, name: impl Into<String>, value: &[u8]) {
        self.headers.push((name.into(), value.to_vec()));
    }

    /// Returns the value of the first header with the given name.
    pub fn header(&self, name: &str) -> Option<&[u8]> {
        self.headers
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_slice())
    }

    /// Returns the first header with the given name as a UTF-8 string,
    /// if present and valid UTF-8.
    pub fn header_str(&self, name: &str) -> Option<&str> {
        self.header(name).and_then(|v| std::str::from_utf8(v).ok())
    }

    /// Iterates over all headers in insertion order.
    pub fn headers(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.headers.iter().map(|(n, v)| (n.as_str(), v.as_slice()))
    }

    /// Number of headers carried by this record.
    pub fn header_count(&self) -> usize {
        self.headers.len()
    }

    /// Whether this record's value was offloaded to the blob store,
    /// according to its [`LARGE_PAYLOAD_HEADER`] header.
    pub fn is_large_payload(&self) -> bool {
        self.header_str(LARGE_PAYLOAD_HEADER) == Some(LARGE_PAYLOAD_YES)
    }
}
