//! The publish pipeline: encode, publish, escalate on failure.
//!
//! A failed primary publish is escalated exactly once to the retry topic
//! with the original payload, so the claim-check decision is re-made for
//! the retry destination. When escalation also fails, the caller gets the
//! primary publish error back.
//!
//! The blob created by the primary encode is left in place on publish
//! failure so the payload stays reachable for diagnostics and replay;
//! setting `cleanup_on_primary_failure` deletes it instead.

use crate::broker::{Acknowledgment, BrokerClient};
use crate::claimcheck::ClaimCheckEncoder;
use crate::record::RecordValue;
use crate::retry::RetryEscalator;
use crate::Result;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

pub struct PublishPipeline {
    encoder: ClaimCheckEncoder,
    broker: Arc<dyn BrokerClient>,
    escalator: RetryEscalator,
    retry_topic: String,
    cleanup_on_primary_failure: bool,
}

impl PublishPipeline {
    pub fn new(
        encoder: ClaimCheckEncoder,
        broker: Arc<dyn BrokerClient>,
        retry_topic: impl Into<String>,
    ) -> Self {
        let escalator = RetryEscalator::new(encoder.clone(), Arc::clone(&broker));
        Self {
            encoder,
            broker,
            escalator,
            retry_topic: retry_topic.into(),
            cleanup_on_primary_failure: false,
        }
    }

    /// Deletes the primary encode's blob when the primary publish fails.
    /// Off by default: the blob is normally kept as the payload's last
    /// reachable representation.
    pub fn with_cleanup_on_primary_failure(mut self, enabled: bool) -> Self {
        self.cleanup_on_primary_failure = enabled;
        self
    }

    /// Encodes and publishes `payload` to `topic`.
    ///
    /// On broker failure the payload is escalated once to the retry topic;
    /// a successful escalation makes the whole call succeed. When the
    /// escalation fails too, the primary publish error is returned after
    /// the escalation has cleaned up its own blob.
    pub async fn publish<T: Serialize>(
        &self,
        topic: &str,
        key: Option<&str>,
        payload: &T,
        correlation_id: Option<&str>,
    ) -> Result<Acknowledgment> {
        let mut record = self.encoder.encode(topic, payload, correlation_id).await?;
        record.key = key.map(str::to_string);

        match self.broker.publish(&record).await {
            Ok(ack) => {
                info!(
                    topic = %topic,
                    partition = ack.partition,
                    offset = ack.offset,
                    large_payload = record.is_large_payload(),
                    "Record published"
                );
                Ok(ack)
            }
            Err(publish_err) => {
                warn!(topic = %topic, error = %publish_err, "Publish failed, escalating to retry topic");
                if self.cleanup_on_primary_failure {
                    self.cleanup_primary_blob(&record.value).await;
                }
                match self
                    .escalator
                    .escalate(&self.retry_topic, payload, correlation_id)
                    .await
                {
                    Ok(ack) => Ok(ack),
                    Err(escalate_err) => {
                        warn!(
                            retry_topic = %self.retry_topic,
                            error = %escalate_err,
                            "Escalation failed, surfacing primary publish error"
                        );
                        Err(publish_err)
                    }
                }
            }
        }
    }

    async fn cleanup_primary_blob(&self, value: &RecordValue) {
        if let RecordValue::Reference(reference) = value {
            match self.encoder.delete(reference).await {
                Ok(deleted) => {
                    info!(reference = %reference, deleted, "Cleaned up primary publish blob")
                }
                Err(e) => {
                    warn!(reference = %reference, error = %e, "Failed to clean up primary publish blob")
                }
            }
        }
    }
}
