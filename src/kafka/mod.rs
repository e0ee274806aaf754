pub mod producer;

pub use producer::KafkaProducer;
