use crate::broker::{Acknowledgment, BrokerClient};
use crate::config::KafkaConfig;
use crate::record::OutgoingRecord;
use crate::{Error, Result};
use async_trait::async_trait;
use rdkafka::message::{Header, OwnedHeaders};
use rdkafka::producer::{FutureProducer, FutureRecord};
use rdkafka::ClientConfig;
use tracing::debug;

pub struct KafkaProducer {
    producer: FutureProducer,
}

impl KafkaProducer {
    pub fn new(brokers: &[String], config: &KafkaConfig) -> Result<Self> {
        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", brokers.join(","))
            .set("compression.type", &config.compression)
            .set("acks", &config.acks)
            .set("linger.ms", config.linger_ms.to_string())
            .set("batch.size", config.batch_size.to_string())
            .set("buffer.memory", config.buffer_memory.to_string())
            .create()
            .map_err(Error::Kafka)?;

        Ok(Self { producer })
    }
}

#[async_trait]
impl BrokerClient for KafkaProducer {
    async fn publish(&self, record: &OutgoingRecord) -> Result<Acknowledgment> {
        let mut headers = OwnedHeaders::new();
        for (name, value) in record.headers() {
            headers = headers.insert(Header {
                key: name,
                value: Some(value),
            });
        }

        let mut future_record = FutureRecord::<str, [u8]>::to(&record.topic)
            .payload(record.value.as_bytes())
            .headers(headers);
        if let Some(key) = record.key.as_deref() {
            future_record = future_record.key(key);
        }

        let (partition, offset) = self
            .producer
            .send(future_record, rdkafka::util::Timeout::Never)
            .await
            .map_err(|(e, _)| Error::Kafka(e))?;

        debug!(topic = %record.topic, partition, offset, "Record delivered");
        Ok(Acknowledgment { partition, offset })
    }
}
