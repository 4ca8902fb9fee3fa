//! Read-only summary of a cache directory.

use std::io;
use std::path::Path;

use super::path::{is_temp_file, SIDECAR_EXTENSION};

/// Counts produced by [`CacheStats::scan`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Sidecar files, i.e. complete entries.
    pub entries: usize,
    /// Body files, with or without a sidecar.
    pub bodies: usize,
    /// Bodies whose sidecar is missing (interrupted downloads).
    pub orphaned_bodies: usize,
    /// Leftover temporary files.
    pub temp_files: usize,
    /// Total size of every file counted above.
    pub total_bytes: u64,
}

impl CacheStats {
    /// Scan `dir` without modifying it.
    pub fn scan(dir: &Path) -> io::Result<Self> {
        let mut stats = Self::default();

        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            let metadata = entry.metadata()?;
            if !metadata.is_file() {
                continue;
            }

            let path = entry.path();
            if is_temp_file(&path) {
                stats.temp_files += 1;
                stats.total_bytes += metadata.len();
                continue;
            }

            match path.extension().and_then(|e| e.to_str()) {
                Some(SIDECAR_EXTENSION) => stats.entries += 1,
                Some("jpg") | Some("png") => {
                    stats.bodies += 1;
                    if !path.with_extension(SIDECAR_EXTENSION).exists() {
                        stats.orphaned_bodies += 1;
                    }
                }
                _ => continue,
            }
            stats.total_bytes += metadata.len();
        }

        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_scan_counts_entries_and_orphans() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("1.json"), b"{}").unwrap();
        std::fs::write(dir.path().join("1.jpg"), b"abcd").unwrap();
        std::fs::write(dir.path().join("2.png"), b"xy").unwrap();
        std::fs::write(dir.path().join(".3.png.1.0.tmp"), b"z").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"ignored").unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();

        let stats = CacheStats::scan(dir.path()).unwrap();

        assert_eq!(stats.entries, 1);
        assert_eq!(stats.bodies, 2);
        assert_eq!(stats.orphaned_bodies, 1);
        assert_eq!(stats.temp_files, 1);
        assert_eq!(stats.total_bytes, 2 + 4 + 2 + 1);
    }

    #[test]
    fn test_scan_missing_directory_errors() {
        let dir = TempDir::new().unwrap();
        assert!(CacheStats::scan(&dir.path().join("missing")).is_err());
    }
}
