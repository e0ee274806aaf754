use clap::Parser;
use kafka_claimcheck::claimcheck::ClaimCheckEncoder;
use kafka_claimcheck::kafka::KafkaProducer;
use kafka_claimcheck::storage::FsBlobStore;
use kafka_claimcheck::{Config, Error, PublishPipeline, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

#[derive(Parser, Debug)]
#[command(name = "kafka-claimcheck")]
#[command(about = "Claim-check message publisher for Kafka", long_about = None)]
struct Args {
    #[arg(short, long, value_name = "FILE", default_value = "config.toml")]
    config: PathBuf,

    #[arg(short, long, value_name = "FILE", help = "JSON payload file to publish")]
    payload: PathBuf,

    #[arg(short, long, help = "Record key")]
    key: Option<String>,

    #[arg(long, help = "Correlation id propagated as a record header")]
    correlation_id: Option<String>,

    #[arg(short, long, help = "Enable JSON output for logs")]
    json_logs: bool,

    #[arg(short, long, help = "Verbose logging")]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(args.json_logs, args.verbose);

    info!("Starting kafka-claimcheck");
    info!("Loading configuration from {:?}", args.config);

    let config = match Config::from_file(&args.config) {
        Ok(cfg) => {
            info!("Configuration loaded successfully");
            cfg
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(Error::Config(e.to_string()));
        }
    };
    config.validate()?;

    info!(
        kafka_brokers = ?config.kafka.brokers,
        kafka_topic = %config.kafka.topic,
        kafka_retry_topic = %config.kafka.retry_topic,
        storage_container = %config.container_dir().display(),
        payload_max_bytes = config.payload.max_bytes,
        "Configuration summary"
    );

    let payload_bytes = tokio::fs::read(&args.payload).await?;
    let payload: serde_json::Value =
        serde_json::from_slice(&payload_bytes).map_err(Error::Serialization)?;

    let store = Arc::new(FsBlobStore::new(
        config.container_dir(),
        &config.payload.file_name,
    ));
    let producer = Arc::new(KafkaProducer::new(&config.kafka.brokers, &config.kafka)?);
    let encoder = ClaimCheckEncoder::new(store, config.payload.max_bytes);
    let pipeline = PublishPipeline::new(encoder, producer, &config.kafka.retry_topic)
        .with_cleanup_on_primary_failure(config.payload.cleanup_on_primary_failure);

    let ack = pipeline
        .publish(
            &config.kafka.topic,
            args.key.as_deref(),
            &payload,
            args.correlation_id.as_deref(),
        )
        .await?;

    info!(
        partition = ack.partition,
        offset = ack.offset,
        "Payload published"
    );

    Ok(())
}

fn init_logging(json: bool, verbose: bool) {
    let env_filter = if verbose {
        EnvFilter::new("kafka_claimcheck=debug,info")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("kafka_claimcheck=info,warn"))
    };

    let fmt_layer = if json {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_current_span(false)
            .with_span_list(false)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_thread_ids(false)
            .with_thread_names(false)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}
