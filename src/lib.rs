//! drvscan: scan local directories for known vulnerable or malicious
//! drivers by checksum, using the loldrivers.io dataset.
//!
//! The library is organized into four layers:
//! - [`core`]: configuration and error types
//! - [`drivers`]: dataset records, loading, and the checksum index
//! - [`scanner`]: file discovery, hashing, and the parallel pipeline
//! - [`ui`]: command-line parsing and match output

pub mod core;
pub mod drivers;
pub mod scanner;
pub mod ui;
pub mod utils;

pub use crate::core::config::Config;
pub use crate::core::error::{Error, Result};
