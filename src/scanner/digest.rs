//! Streaming checksum computation for candidate files.

use crate::core::error::{Error, Result};
use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};
use sha1::Sha1;
use sha2::Sha256;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Buffer size for reading files (64KB).
const BUFFER_SIZE: usize = 64 * 1024;

/// A supported hash algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HashAlgorithm {
    Md5,
    Sha1,
    Sha256,
}

impl HashAlgorithm {
    /// Default order in which algorithms are tried per file. Most dataset
    /// samples are cross-referenced by SHA1, so checking it first minimizes
    /// wasted hashing.
    pub const PRIORITY_ORDER: [HashAlgorithm; 3] = [
        HashAlgorithm::Sha1,
        HashAlgorithm::Sha256,
        HashAlgorithm::Md5,
    ];

    /// Length of this algorithm's hex-encoded digest.
    pub fn digest_len(&self) -> usize {
        match self {
            HashAlgorithm::Md5 => 32,
            HashAlgorithm::Sha1 => 40,
            HashAlgorithm::Sha256 => 64,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HashAlgorithm::Md5 => "MD5",
            HashAlgorithm::Sha1 => "SHA1",
            HashAlgorithm::Sha256 => "SHA256",
        }
    }
}

impl std::fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Compute the digest of a file with the given algorithm, returning the
/// lowercase hex encoding.
///
/// The file is streamed through the hasher in fixed-size chunks, so memory
/// use is independent of file size. All failures are classified per-file
/// read errors and are recoverable.
pub fn digest_file(path: &Path, algorithm: HashAlgorithm) -> Result<String> {
    let file = File::open(path).map_err(|e| Error::file_read(path, e))?;
    let mut reader = BufReader::with_capacity(BUFFER_SIZE, file);

    let digest = match algorithm {
        HashAlgorithm::Md5 => digest_reader::<Md5, _>(&mut reader),
        HashAlgorithm::Sha1 => digest_reader::<Sha1, _>(&mut reader),
        HashAlgorithm::Sha256 => digest_reader::<Sha256, _>(&mut reader),
    }
    .map_err(|e| Error::file_read(path, e))?;

    Ok(digest)
}

/// Stream a reader through a hasher and hex-encode the result.
fn digest_reader<D: Digest, R: Read>(reader: &mut R) -> std::io::Result<String> {
    let mut hasher = D::new();
    let mut buffer = [0u8; BUFFER_SIZE];

    loop {
        let bytes_read = reader.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(hex::encode(hasher.finalize()))
}
