use async_trait::async_trait;
use kafka_claimcheck::broker::{Acknowledgment, BrokerClient};
use kafka_claimcheck::claimcheck::ClaimCheckEncoder;
use kafka_claimcheck::record::OutgoingRecord;
use kafka_claimcheck::storage::FsBlobStore;
use kafka_claimcheck::{Error, PublishPipeline, Result};
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

pub const RETRY_TOPIC: &str = "events.retry";

/// In-process broker that fails a scripted number of publishes before
/// accepting the rest, capturing every accepted record.
pub struct ScriptedBroker {
    fail_remaining: AtomicUsize,
    next_offset: AtomicI64,
    published: Mutex<Vec<OutgoingRecord>>,
}

impl ScriptedBroker {
    pub fn accepting() -> Self {
        Self::failing_first(0)
    }

    pub fn failing_first(failures: usize) -> Self {
        Self {
            fail_remaining: AtomicUsize::new(failures),
            next_offset: AtomicI64::new(0),
            published: Mutex::new(Vec::new()),
        }
    }

    /// Records accepted so far, in publish order.
    pub fn published(&self) -> Vec<OutgoingRecord> {
        self.published.lock().unwrap().clone()
    }
}

#[async_trait]
impl BrokerClient for ScriptedBroker {
    async fn publish(&self, record: &OutgoingRecord) -> Result<Acknowledgment> {
        let remaining = self.fail_remaining.load(Ordering::SeqCst);
        if remaining > 0 {
            self.fail_remaining.store(remaining - 1, Ordering::SeqCst);
            return Err(Error::Publish("broker rejected record".to_string()));
        }
        self.published.lock().unwrap().push(record.clone());
        Ok(Acknowledgment {
            partition: 0,
            offset: self.next_offset.fetch_add(1, Ordering::SeqCst),
        })
    }
}

/// Pipeline over a temp-dir blob store and a scripted broker.
pub struct TestHarness {
    pub pipeline: PublishPipeline,
    pub encoder: ClaimCheckEncoder,
    pub broker: Arc<ScriptedBroker>,
    pub temp_dir: TempDir,
}

impl TestHarness {
    pub fn new(max_bytes: usize, broker: ScriptedBroker) -> Self {
        Self::build(max_bytes, broker, false)
    }

    pub fn with_primary_cleanup(max_bytes: usize, broker: ScriptedBroker) -> Self {
        Self::build(max_bytes, broker, true)
    }

    fn build(max_bytes: usize, broker: ScriptedBroker, cleanup_on_primary_failure: bool) -> Self {
        let temp_dir = TempDir::new().unwrap();
        let store = Arc::new(FsBlobStore::new(temp_dir.path().join("payloads"), "payload"));
        let encoder = ClaimCheckEncoder::new(store, max_bytes);
        let broker = Arc::new(broker);
        let pipeline = PublishPipeline::new(
            encoder.clone(),
            broker.clone() as Arc<dyn BrokerClient>,
            RETRY_TOPIC,
        )
        .with_cleanup_on_primary_failure(cleanup_on_primary_failure);
        Self {
            pipeline,
            encoder,
            broker,
            temp_dir,
        }
    }

    /// Number of blob objects currently in the store.
    pub fn blob_count(&self) -> usize {
        match std::fs::read_dir(self.temp_dir.path().join("payloads")) {
            Ok(entries) => entries.count(),
            Err(_) => 0,
        }
    }
}
