//! Match output formatting and the end-of-scan summary.

use crate::core::error::{Error, Result};
use crate::scanner::pipeline::{DriverMatch, ScanSummary};

/// How matches are rendered on stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable block per match
    Text,
    /// One bare path per line, for piping into other tools
    Grep,
    /// One JSON object per line
    Json,
}

/// Sink for matches as the pipeline finds them.
pub trait MatchWriter {
    fn write_match(&mut self, found: &DriverMatch) -> Result<()>;
}

/// Writes matches to stdout in the selected format.
///
/// Only match lines go to stdout; all logging goes to stderr, so grep and
/// JSON output stay machine-consumable.
pub struct ConsoleWriter {
    format: OutputFormat,
}

impl ConsoleWriter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }
}

impl MatchWriter for ConsoleWriter {
    fn write_match(&mut self, found: &DriverMatch) -> Result<()> {
        match self.format {
            OutputFormat::Text => {
                let category = if found.driver.category.is_empty() {
                    "driver"
                } else {
                    found.driver.category.as_str()
                };
                println!("[!] Found {}", category);
                println!("    |--> Path: {}", found.path.display());
                println!("    |--> {}: {}", found.algorithm, found.checksum);
                println!(
                    "    |--> Link: https://www.loldrivers.io/drivers/{}",
                    found.driver.id
                );
            }
            OutputFormat::Grep => {
                println!("{}", found.path.display());
            }
            OutputFormat::Json => {
                let line = serde_json::to_string(found).map_err(Error::Serialize)?;
                println!("{}", line);
            }
        }
        Ok(())
    }
}

/// Log the end-of-scan summary. Always emitted, in every output format.
pub fn log_summary(summary: &ScanSummary) {
    if summary.matches == 0 {
        log::info!("no vulnerable or malicious drivers found");
    } else {
        log::info!(
            "found a total of {} vulnerable or malicious driver(s)",
            summary.matches
        );
    }

    if summary.read_errors > 0 {
        log::info!(
            "{} file(s) could not be read during the scan",
            summary.read_errors
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::record::{DriverRecord, KnownSample};
    use crate::scanner::digest::HashAlgorithm;
    use std::path::PathBuf;
    use std::sync::Arc;

    fn sample_match() -> DriverMatch {
        DriverMatch {
            path: PathBuf::from("/tmp/suspect.sys"),
            checksum: "aaf4c61ddcc5e8a2dabede0f3b482cd9aea9434d".to_string(),
            algorithm: HashAlgorithm::Sha1,
            driver: Arc::new(DriverRecord {
                id: "driver-1".to_string(),
                category: "vulnerable driver".to_string(),
                known_vulnerable_samples: vec![KnownSample::default()],
                ..DriverRecord::default()
            }),
        }
    }

    #[test]
    fn test_match_serializes_to_json() {
        let found = sample_match();
        let json = serde_json::to_string(&found).unwrap();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["path"], "/tmp/suspect.sys");
        assert_eq!(value["algorithm"], "SHA1");
        assert_eq!(value["driver"]["Id"], "driver-1");
    }

    #[test]
    fn test_console_writer_formats_do_not_fail() {
        let found = sample_match();
        for format in [OutputFormat::Text, OutputFormat::Grep, OutputFormat::Json] {
            let mut writer = ConsoleWriter::new(format);
            writer.write_match(&found).unwrap();
        }
    }
}
