//! Command-line interface for drvscan.

use crate::core::config::{default_scan_dirs, Config};
use crate::core::error::{Error, Result};
use crate::drivers::loader::DatasetSource;
use crate::ui::output::OutputFormat;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Scan local directories for known vulnerable or malicious drivers by
/// comparing file checksums against the loldrivers.io dataset.
#[derive(Parser, Debug)]
#[command(name = "drvscan", version, about)]
pub struct Cli {
    /// Dataset acquisition mode
    #[arg(short, long, value_enum, default_value = "online")]
    pub mode: Mode,

    /// Path to a local drivers.json (required with --mode local)
    #[arg(short = 'f', long)]
    pub driver_file: Option<PathBuf>,

    /// Directory to scan; repeatable. Defaults to the Windows driver
    /// directories
    #[arg(short = 'd', long = "scan-dir")]
    pub scan_dirs: Vec<PathBuf>,

    /// Skip files larger than this size (MB)
    #[arg(short = 'l', long, default_value_t = 10)]
    pub scan_size: u64,

    /// Number of parallel hashing workers
    #[arg(short, long, default_value_t = 20)]
    pub workers: usize,

    /// Log file read errors encountered during the scan
    #[arg(short, long)]
    pub show_errors: bool,

    /// Print matches as bare paths, one per line
    #[arg(short, long, conflicts_with = "json")]
    pub grepable: bool,

    /// Print matches as JSON, one object per line
    #[arg(short, long)]
    pub json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Where the driver dataset comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Download the current dataset from loldrivers.io
    Online,
    /// Read a local drivers.json
    Local,
    /// Use the snapshot bundled into the binary
    Internal,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Resolve the dataset source from the mode and file arguments.
    pub fn dataset_source(&self) -> Result<DatasetSource> {
        match self.mode {
            Mode::Online => Ok(DatasetSource::Online),
            Mode::Internal => Ok(DatasetSource::Internal),
            Mode::Local => match &self.driver_file {
                Some(path) => Ok(DatasetSource::Local(path.clone())),
                None => Err(Error::config_invalid(
                    "driver_file",
                    "--mode local requires --driver-file",
                )),
            },
        }
    }

    pub fn output_format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else if self.grepable {
            OutputFormat::Grep
        } else {
            OutputFormat::Text
        }
    }

    /// Build and validate the full configuration.
    pub fn into_config(self) -> Result<Config> {
        let mut config = Config::default();

        config.dataset.source = self.dataset_source()?;
        config.scan.directories = if self.scan_dirs.is_empty() {
            default_scan_dirs()
        } else {
            self.scan_dirs
        };
        config.scan.size_limit_mb = self.scan_size;
        config.scan.workers = self.workers;
        config.scan.show_errors = self.show_errors;

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["drvscan"]).unwrap();
        assert_eq!(cli.mode, Mode::Online);
        assert_eq!(cli.scan_size, 10);
        assert_eq!(cli.workers, 20);
        assert!(!cli.show_errors);
        assert_eq!(cli.output_format(), OutputFormat::Text);
    }

    #[test]
    fn test_grepable_and_json_conflict() {
        assert!(Cli::try_parse_from(["drvscan", "-g", "-j"]).is_err());
    }

    #[test]
    fn test_local_requires_driver_file() {
        let cli = Cli::try_parse_from(["drvscan", "--mode", "local"]).unwrap();
        assert!(cli.dataset_source().is_err());
    }

    #[test]
    fn test_local_with_driver_file() {
        let cli =
            Cli::try_parse_from(["drvscan", "-m", "local", "-f", "/tmp/drivers.json"]).unwrap();
        assert_eq!(
            cli.dataset_source().unwrap(),
            DatasetSource::Local(PathBuf::from("/tmp/drivers.json"))
        );
    }

    #[test]
    fn test_into_config() {
        let cli = Cli::try_parse_from([
            "drvscan", "-d", "/tmp/a", "-d", "/tmp/b", "-l", "5", "-w", "8", "-s",
        ])
        .unwrap();

        let config = cli.into_config().unwrap();
        assert_eq!(config.scan.directories.len(), 2);
        assert_eq!(config.scan.size_limit_mb, 5);
        assert_eq!(config.scan.workers, 8);
        assert!(config.scan.show_errors);
    }

    #[test]
    fn test_zero_workers_rejected() {
        let cli = Cli::try_parse_from(["drvscan", "-d", "/tmp", "-w", "0"]).unwrap();
        assert!(cli.into_config().is_err());
    }
}
