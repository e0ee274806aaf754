use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub kafka: KafkaConfig,
    pub storage: StorageConfig,
    pub payload: PayloadConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct KafkaConfig {
    pub brokers: Vec<String>,
    pub topic: String,
    pub retry_topic: String,
    #[serde(default = "default_compression")]
    pub compression: String,
    #[serde(default = "default_acks")]
    pub acks: String,
    #[serde(default = "default_linger_ms")]
    pub linger_ms: u32,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_buffer_memory")]
    pub buffer_memory: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    pub root_dir: PathBuf,
    #[serde(default = "default_container")]
    pub container: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PayloadConfig {
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,
    #[serde(default = "default_file_name")]
    pub file_name: String,
    #[serde(default)]
    pub cleanup_on_primary_failure: bool,
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(
                config::Environment::with_prefix("CLAIMCHECK")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// The directory holding offloaded payload objects.
    pub fn container_dir(&self) -> PathBuf {
        self.storage.root_dir.join(&self.storage.container)
    }

    pub fn validate(&self) -> crate::Result<()> {
        if self.payload.max_bytes == 0 {
            return Err(crate::Error::Config(
                "payload.max_bytes must be greater than zero".to_string(),
            ));
        }
        if self.kafka.brokers.is_empty() {
            return Err(crate::Error::Config(
                "kafka.brokers must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_compression() -> String {
    "snappy".to_string()
}

fn default_acks() -> String {
    "all".to_string()
}

fn default_linger_ms() -> u32 {
    100
}

fn default_batch_size() -> usize {
    16384
}

fn default_buffer_memory() -> usize {
    33_554_432 // 32MB
}

fn default_container() -> String {
    "payloads".to_string()
}

fn default_max_bytes() -> usize {
    1_048_576 // 1MB
}

fn default_file_name() -> String {
    "payload".to_string()
}
