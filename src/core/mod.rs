//! Core module containing configuration and error handling.

pub mod config;
pub mod error;

pub use config::Config;
pub use error::{Error, Result};
