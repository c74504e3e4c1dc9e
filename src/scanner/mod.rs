//! File discovery, checksum computation, and the parallel scan pipeline.

pub mod digest;
pub mod pipeline;
pub mod walker;

pub use digest::HashAlgorithm;
pub use pipeline::{DriverMatch, ScanPipeline, ScanStatus, ScanSummary};
