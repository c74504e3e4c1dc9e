//! Loading the loldrivers.io driver dataset.
//!
//! Three acquisition modes: download the current dataset, read a local JSON
//! file, or use the snapshot bundled into the binary at build time. Online
//! and local failures fall back to the bundled snapshot; if the snapshot
//! itself cannot be parsed the error is fatal.

use crate::core::error::{Error, Result};
use crate::drivers::record::DriverRecord;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Download link to the current `drivers.json`.
pub const DRIVERS_API_URL: &str = "https://www.loldrivers.io/api/drivers.json";

/// Request timeout for the dataset download.
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(30);

/// Snapshot of the dataset bundled at build time, refreshed at release time.
static BUNDLED_DRIVERS: &[u8] =
    include_bytes!(concat!(env!("CARGO_MANIFEST_DIR"), "/data/drivers.json"));

/// Where the driver dataset is loaded from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetSource {
    /// Download the current dataset from loldrivers.io
    Online,
    /// Read a `drivers.json` from disk
    Local(PathBuf),
    /// Use the snapshot bundled into the binary
    Internal,
}

impl std::fmt::Display for DatasetSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatasetSource::Online => write!(f, "online"),
            DatasetSource::Local(path) => write!(f, "local ({})", path.display()),
            DatasetSource::Internal => write!(f, "internal"),
        }
    }
}

/// Load driver records from the given source.
pub async fn load(source: &DatasetSource) -> Result<Vec<DriverRecord>> {
    log::info!("loading drivers with mode '{}'", source);

    match source {
        DatasetSource::Online => {
            let fetched = match download().await {
                Ok(bytes) => parse(&bytes),
                Err(e) => Err(e),
            };
            unwrap_or_bundled(fetched)
        }
        DatasetSource::Local(path) => unwrap_or_bundled(read_local(path).and_then(|b| parse(&b))),
        DatasetSource::Internal => parse(BUNDLED_DRIVERS),
    }
}

/// Return the loaded records, or fall back to the bundled snapshot on any
/// acquisition or parse failure.
fn unwrap_or_bundled(loaded: Result<Vec<DriverRecord>>) -> Result<Vec<DriverRecord>> {
    match loaded {
        Ok(records) => Ok(records),
        Err(e) => {
            log::warn!("{}, falling back to the bundled snapshot", e);
            parse(BUNDLED_DRIVERS)
        }
    }
}

/// Download the current dataset as raw bytes.
async fn download() -> Result<Vec<u8>> {
    log::info!("downloading the newest drivers");

    let client = reqwest::Client::builder()
        .user_agent(concat!("drvscan/", env!("CARGO_PKG_VERSION")))
        .timeout(DOWNLOAD_TIMEOUT)
        .build()
        .map_err(|e| Error::DatasetDownload {
            url: DRIVERS_API_URL.to_string(),
            source: e,
        })?;

    let response = client
        .get(DRIVERS_API_URL)
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|e| Error::DatasetDownload {
            url: DRIVERS_API_URL.to_string(),
            source: e,
        })?;

    let bytes = response.bytes().await.map_err(|e| Error::DatasetDownload {
        url: DRIVERS_API_URL.to_string(),
        source: e,
    })?;

    log::debug!("downloaded {} bytes", bytes.len());
    Ok(bytes.to_vec())
}

/// Read a local dataset file as raw bytes.
fn read_local(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|e| Error::DatasetRead {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Parse JSON bytes into driver records.
pub fn parse(bytes: &[u8]) -> Result<Vec<DriverRecord>> {
    serde_json::from_slice(bytes).map_err(Error::DatasetParse)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_bundled_snapshot_parses() {
        let records = parse(BUNDLED_DRIVERS).unwrap();
        assert!(!records.is_empty());
        // Every bundled record must carry at least one usable sample.
        for record in &records {
            assert!(!record.id.is_empty());
            assert!(!record.known_vulnerable_samples.is_empty());
        }
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse(b"not json at all").is_err());
    }

    #[tokio::test]
    async fn test_local_file_loads() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(br#"[{"Id": "local-1", "Category": "malicious"}]"#)
            .unwrap();

        let records = load(&DatasetSource::Local(file.path().to_path_buf()))
            .await
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "local-1");
    }

    #[tokio::test]
    async fn test_missing_local_file_falls_back_to_snapshot() {
        let source = DatasetSource::Local(PathBuf::from("/nonexistent/drivers.json"));
        let records = load(&source).await.unwrap();

        let bundled = parse(BUNDLED_DRIVERS).unwrap();
        assert_eq!(records.len(), bundled.len());
    }

    #[tokio::test]
    async fn test_malformed_local_file_falls_back_to_snapshot() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"{broken").unwrap();

        let records = load(&DatasetSource::Local(file.path().to_path_buf()))
            .await
            .unwrap();
        assert!(!records.is_empty());
    }

    #[tokio::test]
    async fn test_internal_mode() {
        let records = load(&DatasetSource::Internal).await.unwrap();
        assert!(!records.is_empty());
    }
}
