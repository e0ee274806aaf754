//! Escalation of exhausted publish attempts onto the retry topic.
//!
//! The escalator re-runs claim-check encoding against the retry topic, so
//! the offload decision is made fresh for the retry destination. It is
//! single-shot: when its own publish fails it cleans up the blob it minted
//! and surfaces the failure instead of escalating again.

use crate::broker::{Acknowledgment, BrokerClient};
use crate::claimcheck::ClaimCheckEncoder;
use crate::record::RecordValue;
use crate::Result;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

pub struct RetryEscalator {
    encoder: ClaimCheckEncoder,
    broker: Arc<dyn BrokerClient>,
}

impl RetryEscalator {
    pub fn new(encoder: ClaimCheckEncoder, broker: Arc<dyn BrokerClient>) -> Self {
        Self { encoder, broker }
    }

    /// Re-encodes `payload` against `retry_topic` and publishes it.
    ///
    /// On success any blob minted here stays live: it is the payload's
    /// durable representation on the retry topic. On publish failure the
    /// minted blob is deleted best-effort and the publish error is
    /// returned; a failed delete is logged, never re-raised.
    pub async fn escalate<T: Serialize>(
        &self,
        retry_topic: &str,
        payload: &T,
        correlation_id: Option<&str>,
    ) -> Result<Acknowledgment> {
        let record = self.encoder.encode(retry_topic, payload, correlation_id).await?;
        let minted = match &record.value {
            RecordValue::Reference(reference) => Some(reference.clone()),
            RecordValue::Inline(_) => None,
        };

        match self.broker.publish(&record).await {
            Ok(ack) => {
                info!(
                    retry_topic = %retry_topic,
                    partition = ack.partition,
                    offset = ack.offset,
                    "Payload escalated to retry topic"
                );
                Ok(ack)
            }
            Err(publish_err) => {
                warn!(retry_topic = %retry_topic, error = %publish_err, "Escalation publish failed");
                if let Some(reference) = minted {
                    match self.encoder.delete(&reference).await {
                        Ok(deleted) => {
                            info!(reference = %reference, deleted, "Cleaned up escalation blob")
                        }
                        Err(delete_err) => warn!(
                            reference = %reference,
                            error = %delete_err,
                            "Failed to clean up escalation blob"
                        ),
                    }
                }
                Err(publish_err)
            }
        }
    }
}
