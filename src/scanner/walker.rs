//! Recursive discovery of candidate driver files.

use crate::core::error::{Error, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Walk a directory tree and feed every candidate file to `emit`.
///
/// A candidate is a regular file at or below the size limit. Symlinks are
/// not followed. Entries that cannot be stat'd, are unreadable, or exceed
/// the limit are skipped quietly; only an inaccessible root is an error.
///
/// `emit` returns `false` to stop the walk early. The return value is the
/// number of files `emit` accepted; a rejected path is not counted.
pub fn walk<F>(root: &Path, size_limit_bytes: u64, mut emit: F) -> Result<u64>
where
    F: FnMut(PathBuf) -> bool,
{
    // Surface a missing or inaccessible root before starting the walk,
    // since WalkDir only reports it as a per-entry error.
    std::fs::metadata(root).map_err(|e| Error::directory_access(root, e))?;

    let mut emitted = 0u64;

    for entry in WalkDir::new(root).follow_links(false) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                log::debug!("skipping unreadable entry under {}: {}", root.display(), e);
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let metadata = match entry.metadata() {
            Ok(metadata) => metadata,
            Err(e) => {
                log::debug!("skipping {}: {}", entry.path().display(), e);
                continue;
            }
        };

        if !is_readable(&metadata) {
            log::debug!("skipping {}: not readable", entry.path().display());
            continue;
        }

        if metadata.len() > size_limit_bytes {
            log::debug!(
                "skipping {}: {} bytes exceeds the size limit",
                entry.path().display(),
                metadata.len()
            );
            continue;
        }

        if !emit(entry.into_path()) {
            break;
        }
        emitted += 1;
    }

    Ok(emitted)
}

/// Best-effort readability check from the file mode.
///
/// Opening can still fail later; the hashing side classifies that failure
/// properly. This only filters out the obvious cases cheaply.
#[cfg(unix)]
fn is_readable(metadata: &std::fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o400 != 0
}

#[cfg(not(unix))]
fn is_readable(_metadata: &std::fs::Metadata) -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn collect(root: &Path, size_limit_bytes: u64) -> Vec<PathBuf> {
        let mut paths = Vec::new();
        walk(root, size_limit_bytes, |path| {
            paths.push(path);
            true
        })
        .unwrap();
        paths.sort();
        paths
    }

    #[test]
    fn test_discovers_nested_files() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.sys"), b"aaa").unwrap();
        fs::create_dir_all(dir.path().join("sub/deeper")).unwrap();
        fs::write(dir.path().join("sub/b.sys"), b"bbb").unwrap();
        fs::write(dir.path().join("sub/deeper/c.sys"), b"ccc").unwrap();

        let paths = collect(dir.path(), 1024);
        assert_eq!(paths.len(), 3);
    }

    #[test]
    fn test_size_boundary() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("at_limit.sys"), vec![0u8; 100]).unwrap();
        fs::write(dir.path().join("over_limit.sys"), vec![0u8; 101]).unwrap();

        let paths = collect(dir.path(), 100);
        assert_eq!(paths.len(), 1);
        assert!(paths[0].ends_with("at_limit.sys"));
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let result = walk(Path::new("/nonexistent/scan/root"), 1024, |_| true);
        assert!(matches!(result, Err(Error::DirectoryAccess { .. })));
    }

    #[test]
    fn test_emit_false_stops_the_walk() {
        let dir = tempdir().unwrap();
        for i in 0..5 {
            fs::write(dir.path().join(format!("{i}.sys")), b"x").unwrap();
        }

        // The rejected path is not counted as emitted.
        let mut seen = 0;
        let emitted = walk(dir.path(), 1024, |_| {
            seen += 1;
            false
        })
        .unwrap();
        assert_eq!(seen, 1);
        assert_eq!(emitted, 0);
    }

    #[test]
    fn test_rejected_path_not_counted() {
        let dir = tempdir().unwrap();
        for i in 0..3 {
            fs::write(dir.path().join(format!("{i}.sys")), b"x").unwrap();
        }

        let mut seen = 0;
        let emitted = walk(dir.path(), 1024, |_| {
            seen += 1;
            seen < 3
        })
        .unwrap();
        assert_eq!(seen, 3);
        assert_eq!(emitted, 2);
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_file_skipped() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let locked = dir.path().join("locked.sys");
        fs::write(&locked, b"x").unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
        fs::write(dir.path().join("open.sys"), b"x").unwrap();

        // The mode-bit check applies even when running as root, where the
        // actual open would succeed regardless.
        let paths = collect(dir.path(), 1024);
        assert_eq!(paths.len(), 1);
        assert!(paths[0].ends_with("open.sys"));
    }
}
