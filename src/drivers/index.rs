//! Checksum lookup structure built from the driver dataset.

use crate::drivers::record::{sample_digest, DriverRecord};
use crate::scanner::digest::HashAlgorithm;
use std::collections::HashMap;
use std::sync::Arc;

/// Immutable-after-build mapping from hex digest to the driver record that
/// declares it as a known-bad sample, partitioned by algorithm.
///
/// The index owns the records; it is built once before scanning starts and
/// never mutated afterwards, so it is safe to share across workers behind an
/// `Arc` without any locking.
#[derive(Debug, Default)]
pub struct HashIndex {
    md5: HashMap<String, Arc<DriverRecord>>,
    sha1: HashMap<String, Arc<DriverRecord>>,
    sha256: HashMap<String, Arc<DriverRecord>>,
    records: usize,
}

impl HashIndex {
    /// Build the index from a set of driver records.
    ///
    /// Empty digests and the dataset's `-` placeholder are never inserted.
    /// Malformed digest strings are stored as-is; a duplicate digest is
    /// last-write-wins.
    pub fn build(records: Vec<DriverRecord>) -> Self {
        let mut index = HashIndex {
            records: records.len(),
            ..HashIndex::default()
        };

        for record in records {
            let record = Arc::new(record);
            for sample in &record.known_vulnerable_samples {
                if let Some(digest) = sample_digest(&sample.md5) {
                    index.md5.insert(digest.to_string(), Arc::clone(&record));
                }
                if let Some(digest) = sample_digest(&sample.sha1) {
                    index.sha1.insert(digest.to_string(), Arc::clone(&record));
                }
                if let Some(digest) = sample_digest(&sample.sha256) {
                    index.sha256.insert(digest.to_string(), Arc::clone(&record));
                }
            }
        }

        index
    }

    /// Look up a digest, selecting the algorithm bucket by digest length
    /// (32 is MD5, 40 is SHA1, 64 is SHA256).
    ///
    /// Any other length is a clean miss, not an error.
    pub fn lookup(&self, digest: &str) -> Option<&Arc<DriverRecord>> {
        match digest.len() {
            len if len == HashAlgorithm::Md5.digest_len() => self.md5.get(digest),
            len if len == HashAlgorithm::Sha1.digest_len() => self.sha1.get(digest),
            len if len == HashAlgorithm::Sha256.digest_len() => self.sha256.get(digest),
            _ => None,
        }
    }

    /// Number of driver records the index was built from.
    pub fn record_count(&self) -> usize {
        self.records
    }

    /// Total number of indexed digests across all algorithms.
    pub fn digest_count(&self) -> usize {
        self.md5.len() + self.sha1.len() + self.sha256.len()
    }

    /// True if no digests were indexed.
    pub fn is_empty(&self) -> bool {
        self.digest_count() == 0
    }
}
