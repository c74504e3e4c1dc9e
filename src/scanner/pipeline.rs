//! The scan pipeline: discovery, hashing workers, and result aggregation.
//!
//! One blocking walker task feeds a bounded path channel, a pool of hashing
//! workers drains it, and matches flow over a second bounded channel back to
//! the caller's writer. Backpressure is inherent: a slow consumer stalls the
//! workers, and stalled workers stall the walker.

use crate::core::config::Config;
use crate::core::error::{Error, Result};
use crate::drivers::index::HashIndex;
use crate::drivers::record::DriverRecord;
use crate::scanner::digest::{digest_file, HashAlgorithm};
use crate::scanner::walker;
use crate::ui::output::MatchWriter;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{mpsc, Mutex};

/// Capacity of the match channel between workers and the aggregator.
const MATCH_CHANNEL_CAPACITY: usize = 64;

/// A scanned file whose checksum matched a known-bad sample.
#[derive(Debug, Clone, Serialize)]
pub struct DriverMatch {
    /// Path of the file on disk
    pub path: PathBuf,
    /// The digest that matched
    pub checksum: String,
    /// Algorithm that produced the matching digest
    pub algorithm: HashAlgorithm,
    /// The dataset record the digest belongs to
    pub driver: Arc<DriverRecord>,
}

/// How a scan ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanStatus {
    Completed,
    Cancelled,
}

/// Final tallies of one scan run.
#[derive(Debug, Clone, Serialize)]
pub struct ScanSummary {
    pub files_hashed: u64,
    pub matches: u64,
    pub read_errors: u64,
    pub status: ScanStatus,
    pub duration_secs: f64,
}

/// Per-worker counters, summed into the final summary.
#[derive(Debug, Default)]
struct WorkerTally {
    hashed: u64,
    read_errors: u64,
}

/// A configured scan over a prebuilt hash index.
///
/// The pipeline holds no mutable state between runs; `run` can be called
/// again after a completed scan.
pub struct ScanPipeline {
    index: Arc<HashIndex>,
    config: Arc<Config>,
    cancelled: Arc<AtomicBool>,
}

impl ScanPipeline {
    pub fn new(index: Arc<HashIndex>, config: Arc<Config>) -> Self {
        Self {
            index,
            config,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Request cancellation. The walker stops emitting and workers stop
    /// picking up new paths; files already being hashed finish.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// Run the scan, writing every match to `writer` as it is found.
    ///
    /// Per-file read failures are tallied and logged, never fatal. An
    /// inaccessible scan root is logged and the remaining roots are still
    /// scanned.
    pub async fn run(&self, writer: &mut dyn MatchWriter) -> Result<ScanSummary> {
        let started = Instant::now();
        let workers = self.config.scan.workers;

        let (path_tx, path_rx) = mpsc::channel::<PathBuf>(workers * 2);
        let path_rx = Arc::new(Mutex::new(path_rx));
        let (match_tx, mut match_rx) = mpsc::channel::<DriverMatch>(MATCH_CHANNEL_CAPACITY);

        let walker_task = {
            let roots = self.config.scan.directories.clone();
            let size_limit = self.config.scan.size_limit_bytes();
            let cancelled = Arc::clone(&self.cancelled);

            tokio::task::spawn_blocking(move || {
                let mut discovered = 0u64;
                for root in &roots {
                    if cancelled.load(Ordering::Relaxed) {
                        break;
                    }
                    log::info!("scanning directory {}", root.display());
                    let result = walker::walk(root, size_limit, |path| {
                        if cancelled.load(Ordering::Relaxed) {
                            return false;
                        }
                        path_tx.blocking_send(path).is_ok()
                    });
                    match result {
                        Ok(count) => discovered += count,
                        Err(e) => log::error!("{}", e),
                    }
                }
                discovered
            })
        };

        let mut worker_tasks = Vec::with_capacity(workers);
        for _ in 0..workers {
            let path_rx = Arc::clone(&path_rx);
            let match_tx = match_tx.clone();
            let index = Arc::clone(&self.index);
            let config = Arc::clone(&self.config);
            let cancelled = Arc::clone(&self.cancelled);

            worker_tasks.push(tokio::spawn(async move {
                let mut tally = WorkerTally::default();
                loop {
                    if cancelled.load(Ordering::Relaxed) {
                        break;
                    }
                    let path = { path_rx.lock().await.recv().await };
                    let Some(path) = path else { break };

                    match scan_file(&path, &index, &config) {
                        Ok(Some(found)) => {
                            tally.hashed += 1;
                            if match_tx.send(found).await.is_err() {
                                break;
                            }
                        }
                        Ok(None) => tally.hashed += 1,
                        Err(e) => {
                            if config.scan.show_errors {
                                log::warn!("{}", e);
                            } else {
                                log::debug!("{}", e);
                            }
                            tally.read_errors += 1;
                        }
                    }
                }
                tally
            }));
        }

        // Only the workers may keep the path receiver alive: when the last
        // worker exits, the receiver is destroyed and a walker blocked in
        // blocking_send unblocks with an error instead of hanging.
        drop(path_rx);

        // The match channel closes once every worker clone is gone.
        drop(match_tx);

        let mut matches = 0u64;
        while let Some(found) = match_rx.recv().await {
            if let Err(e) = writer.write_match(&found) {
                log::error!("failed to write match for {}: {}", found.path.display(), e);
            }
            matches += 1;
        }

        let discovered = walker_task
            .await
            .map_err(|e| Error::Internal(format!("walker task failed: {e}")))?;

        let mut files_hashed = 0u64;
        let mut read_errors = 0u64;
        for task in worker_tasks {
            let tally = task
                .await
                .map_err(|e| Error::Internal(format!("worker task failed: {e}")))?;
            files_hashed += tally.hashed;
            read_errors += tally.read_errors;
        }

        let status = if self.is_cancelled() {
            ScanStatus::Cancelled
        } else {
            ScanStatus::Completed
        };
        log::debug!(
            "discovered {} files, hashed {}, {} read errors",
            discovered,
            files_hashed,
            read_errors
        );

        Ok(ScanSummary {
            files_hashed,
            matches,
            read_errors,
            status,
            duration_secs: started.elapsed().as_secs_f64(),
        })
    }
}

/// Hash one file with each configured algorithm in turn, stopping at the
/// first digest the index knows.
fn scan_file(path: &Path, index: &HashIndex, config: &Config) -> Result<Option<DriverMatch>> {
    for &algorithm in &config.scan.algorithms {
        let checksum = digest_file(path, algorithm)?;
        if let Some(driver) = index.lookup(&checksum) {
            return Ok(Some(DriverMatch {
                path: path.to_path_buf(),
                checksum,
                algorithm,
                driver: Arc::clone(driver),
            }));
        }
    }
    Ok(None)
}
