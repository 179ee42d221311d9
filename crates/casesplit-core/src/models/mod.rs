//! Data models shared across the pipeline.

pub mod chunk;
pub mod config;
pub mod summary;

pub use chunk::Chunk;
pub use config::{EnhanceOptions, ModelConfig, OutputConfig, ScanConfig, SplitConfig};
pub use summary::{SummaryRecorder, SummaryRow};
