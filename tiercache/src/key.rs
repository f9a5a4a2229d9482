//! Key-to-filename mapping.
//!
//! Cache keys are arbitrary caller-supplied strings; the disk tier needs a
//! stable, filesystem-safe file name for each. Keys are hashed with SHA-256
//! and hex-encoded, so the same key maps to the same file name across runs
//! and processes, with no I/O involved. Two distinct keys that hash to the
//! same digest would overwrite each other; with a 256-bit digest this is
//! accepted rather than defended against.

use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

/// Returns the on-disk file name for a cache key.
pub(crate) fn filename_for_key(key: &str) -> String {
    hex::encode(Sha256::digest(key.as_bytes()))
}

/// Returns the full path of the entry for `key` under `root`.
pub(crate) fn path_for_key(root: &Path, key: &str) -> PathBuf {
    root.join(filename_for_key(key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filename_is_stable() {
        assert_eq!(filename_for_key("k1"), filename_for_key("k1"));
    }

    #[test]
    fn test_distinct_keys_get_distinct_filenames() {
        assert_ne!(filename_for_key("k1"), filename_for_key("k2"));
    }

    #[test]
    fn test_filename_is_filesystem_safe() {
        // Keys may contain separators and arbitrary unicode; file names
        // must not.
        let name = filename_for_key("a/b/../c:\\d ☃");
        assert_eq!(name.len(), 64);
        assert!(name.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_path_for_key_joins_root() {
        let path = path_for_key(Path::new("/tmp/cache"), "k1");
        assert_eq!(path.parent(), Some(Path::new("/tmp/cache")));
        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            filename_for_key("k1")
        );
    }
}
