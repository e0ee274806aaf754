//! Error types and result handling for kafka-claimcheck.
//!
//! This module defines the main error type [`Error`] and a convenience
//! [`Result`] type alias used throughout the crate.
//!
//! # Example
//!
//! ```rust
//! use kafka_claimcheck::{Error, Result};
//!
//! fn write_to_store() -> Result<()> {
//!     // Simulating an unreachable blob store
//!     Err(Error::StorageUnavailable("connection refused".to_string()))
//! }
//!
//! match write_to_store() {
//!     Ok(()) => println!("Stored"),
//!     Err(Error::StorageUnavailable(msg)) => eprintln!("Storage error: {}", msg),
//!     Err(e) => eprintln!("Other error: {}", e),
//! }
//! ```

use thiserror::Error;

/// The main error type for kafka-claimcheck operations.
///
/// This enum represents all possible errors that can occur while encoding,
/// publishing, or escalating a payload, from configuration issues to
/// runtime failures against the blob store or the broker.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error, typically from an invalid config file or
    /// environment variables.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The payload could not be converted to bytes. Fatal to the current
    /// call; never retried.
    #[error("Serialization error: {0}")]
    Serialization(serde_json::Error),

    /// Blob content could not be read back as the expected payload type,
    /// or a record's value did not match its `isLargePayload` header.
    #[error("Deserialization error: {message}")]
    Deserialization {
        /// Description of what could not be decoded
        message: String,
    },

    /// The blob store was unreachable or rejected the operation.
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    /// A read was attempted against a blob reference that no longer
    /// exists. Deletes treat this case as a successful no-op instead.
    #[error("Blob not found: {reference}")]
    BlobNotFound {
        /// The reference that did not resolve to a stored object
        reference: String,
    },

    /// Kafka client or producer error.
    #[error("Kafka error: {0}")]
    Kafka(#[from] rdkafka::error::KafkaError),

    /// The broker rejected or could not deliver a record. Triggers
    /// escalation to the retry topic when raised from the primary publish.
    #[error("Publish error: {0}")]
    Publish(String),

    /// I/O error, typically from reading a payload file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A convenient Result type alias for kafka-claimcheck operations.
///
/// This is equivalent to `std::result::Result<T, kafka_claimcheck::Error>`.
///
/// # Example
///
/// ```rust
/// use kafka_claimcheck::Result;
///
/// fn do_something() -> Result<String> {
///     Ok("Success".to_string())
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;
