//! Download management: quality tokens, external tools, artifacts and the pipeline

pub mod artifact;
pub mod error;
pub mod pipeline;
pub mod quality;
pub mod send;
pub mod tools;

// Re-exports for convenience
pub use error::DownloadError;
pub use pipeline::{DownloadPipeline, PipelineOutcome, PipelineSettings, PipelineState};
pub use quality::{DeliveryMode, DownloadRequest, Quality};
pub use send::{Attachment, LocalSink, Menu, OutboundSink};
pub use tools::{MediaTools, ProcessTools};
