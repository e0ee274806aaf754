use crate::record::OutgoingRecord;
use crate::Result;
use async_trait::async_trait;

/// Broker confirmation for a delivered record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Acknowledgment {
    pub partition: i32,
    pub offset: i64,
}

/// Seam to the message broker.
///
/// Implementations carry their own delivery and send-retry policy; the
/// pipeline treats any returned error as an exhausted publish attempt and
/// escalates. Must be safe for concurrent use by multiple callers.
#[async_trait]
pub trait BrokerClient: Send + Sync {
    async fn publish(&self, record: &OutgoingRecord) -> Result<Acknowledgment>;
}
