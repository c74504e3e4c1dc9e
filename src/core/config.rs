//! Configuration for drvscan.
//!
//! The configuration is assembled from command-line arguments; there is no
//! persisted config file. All values are validated once, before any scanning
//! work begins.

use crate::core::error::{Error, Result};
use crate::drivers::loader::DatasetSource;
use crate::scanner::digest::HashAlgorithm;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Scan-related settings
    pub scan: ScanConfig,
    /// Driver dataset acquisition settings
    pub dataset: DatasetConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scan: ScanConfig::default(),
            dataset: DatasetConfig::default(),
        }
    }
}

impl Config {
    /// Validate the configuration values.
    pub fn validate(&self) -> Result<()> {
        if self.scan.directories.is_empty() {
            return Err(Error::config_invalid(
                "scan.directories",
                "at least one scan directory is required",
            ));
        }

        if self.scan.size_limit_mb == 0 {
            return Err(Error::config_invalid(
                "scan.size_limit_mb",
                "must be greater than 0",
            ));
        }

        if self.scan.workers == 0 {
            return Err(Error::config_invalid(
                "scan.workers",
                "must be greater than 0",
            ));
        }

        if self.scan.algorithms.is_empty() {
            return Err(Error::config_invalid(
                "scan.algorithms",
                "at least one hash algorithm is required",
            ));
        }

        Ok(())
    }
}

/// Scan-related configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Directories to walk for candidate driver files
    pub directories: Vec<PathBuf>,
    /// Skip files larger than this size (MB)
    pub size_limit_mb: u64,
    /// Number of parallel checksum workers
    pub workers: usize,
    /// Log file read errors encountered while hashing
    pub show_errors: bool,
    /// Hash algorithms in the order they are tried per file
    pub algorithms: Vec<HashAlgorithm>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            directories: default_scan_dirs(),
            size_limit_mb: 10,
            workers: 20,
            show_errors: false,
            algorithms: HashAlgorithm::PRIORITY_ORDER.to_vec(),
        }
    }
}

impl ScanConfig {
    /// The size limit in bytes. Files exactly at the limit are still scanned.
    pub fn size_limit_bytes(&self) -> u64 {
        self.size_limit_mb * 1024 * 1024
    }
}

/// Driver dataset acquisition configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// Where the dataset is loaded from
    pub source: DatasetSource,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            source: DatasetSource::Online,
        }
    }
}

/// The default Windows driver directories.
///
/// On other platforms there is no sensible default; the user must pass
/// explicit scan directories.
pub fn default_scan_dirs() -> Vec<PathBuf> {
    #[cfg(windows)]
    {
        vec![
            PathBuf::from("C:\\Windows\\System32\\drivers"),
            PathBuf::from("C:\\Windows\\System32\\DriverStore\\FileRepository"),
            PathBuf::from("C:\\WINDOWS\\inf"),
        ]
    }

    #[cfg(not(windows))]
    {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> Config {
        let mut config = Config::default();
        config.scan.directories = vec![PathBuf::from("/tmp")];
        config
    }

    #[test]
    fn test_valid_config() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_zero_workers_rejected() {
        let mut config = valid_config();
        config.scan.workers = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_size_limit_rejected() {
        let mut config = valid_config();
        config.scan.size_limit_mb = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_no_directories_rejected() {
        let mut config = valid_config();
        config.scan.directories.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_size_limit_bytes() {
        let mut config = valid_config();
        config.scan.size_limit_mb = 10;
        assert_eq!(config.scan.size_limit_bytes(), 10 * 1024 * 1024);
    }

    #[test]
    fn test_default_priority_order() {
        let config = ScanConfig::default();
        assert_eq!(
            config.algorithms,
            vec![
                HashAlgorithm::Sha1,
                HashAlgorithm::Sha256,
                HashAlgorithm::Md5
            ]
        );
    }
}
