pub mod broker;
pub mod claimcheck;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod record;
pub mod retry;
pub mod serializer;
pub mod sizer;
pub mod storage;

pub mod kafka;

pub use config::Config;
pub use error::{Error, Result};
pub use pipeline::PublishPipeline;
