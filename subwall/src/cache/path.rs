//! Cache path construction and filename handling.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use super::content_type::ImageType;
use crate::candidate::ContentHash;

/// Extension of metadata sidecar files.
pub const SIDECAR_EXTENSION: &str = "json";

/// Extension of in-progress temporary files.
pub const TEMP_EXTENSION: &str = "tmp";

/// Path of the metadata sidecar for a hash.
///
/// ```text
/// <cache_dir>/<hash>.json
/// ```
///
/// # Example
///
/// ```
/// use std::path::PathBuf;
/// use subwall::cache::sidecar_path;
/// use subwall::candidate::ContentHash;
///
/// let hash = ContentHash::of("123456789");
/// assert_eq!(
///     sidecar_path(&PathBuf::from("/walls"), hash),
///     PathBuf::from("/walls/3421780262.json")
/// );
/// ```
pub fn sidecar_path(cache_dir: &Path, hash: ContentHash) -> PathBuf {
    cache_dir.join(format!("{}.{}", hash, SIDECAR_EXTENSION))
}

/// Path of the stored body for a hash and image type.
///
/// ```text
/// <cache_dir>/<hash>.<jpg|png>
/// ```
///
/// # Example
///
/// ```
/// use std::path::PathBuf;
/// use subwall::cache::{body_path, ImageType};
/// use subwall::candidate::ContentHash;
///
/// let hash = ContentHash::of("123456789");
/// assert_eq!(
///     body_path(&PathBuf::from("/walls"), hash, ImageType::Png),
///     PathBuf::from("/walls/3421780262.png")
/// );
/// ```
pub fn body_path(cache_dir: &Path, hash: ContentHash, image_type: ImageType) -> PathBuf {
    cache_dir.join(format!("{}.{}", hash, image_type.extension()))
}

/// A unique hidden sibling of `target` to write into before renaming.
///
/// Names differ per call so concurrent writers never share a temp file.
pub fn temp_sibling(target: &Path) -> PathBuf {
    static COUNTER: AtomicU64 = AtomicU64::new(0);

    let seq = COUNTER.fetch_add(1, Ordering::Relaxed);
    let name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    target.with_file_name(format!(
        ".{}.{}.{}.{}",
        name,
        std::process::id(),
        seq,
        TEMP_EXTENSION
    ))
}

/// True for files produced by [`temp_sibling`].
pub fn is_temp_file(path: &Path) -> bool {
    let hidden = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with('.'));
    hidden && path.extension().and_then(|e| e.to_str()) == Some(TEMP_EXTENSION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_share_hash_stem() {
        let dir = Path::new("/cache");
        let hash = ContentHash::of("https://i.redd.it/a.jpg");

        let sidecar = sidecar_path(dir, hash);
        let body = body_path(dir, hash, ImageType::Jpg);

        assert_eq!(sidecar.file_stem(), body.file_stem());
        assert_eq!(body.extension().unwrap(), "jpg");
        assert_eq!(sidecar.parent(), Some(dir));
    }

    #[test]
    fn test_temp_siblings_are_unique_and_recognized() {
        let target = Path::new("/cache/42.png");
        let a = temp_sibling(target);
        let b = temp_sibling(target);

        assert_ne!(a, b);
        assert_eq!(a.parent(), target.parent());
        assert!(is_temp_file(&a));
        assert!(!is_temp_file(target));
    }
}
