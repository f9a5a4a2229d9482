//! Cache error types.

use thiserror::Error;

/// Errors surfaced by the cache.
///
/// The byte tiers are best-effort: a disk mutation that fails is logged and
/// dropped, and a lookup miss is `None`, so neither produces a `CacheError`.
/// The error type appears at the typed codec boundary, where a value that
/// fails to encode or decode is a caller-visible condition rather than a
/// cache miss.
#[derive(Debug, Error)]
pub enum CacheError {
    /// I/O error during a cache operation.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to encode or decode a typed value at the codec boundary.
    #[error("Codec error: {0}")]
    Codec(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let cache_err: CacheError = io_err.into();
        assert!(matches!(cache_err, CacheError::Io(_)));
    }

    #[test]
    fn test_cache_error_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: CacheError = io_err.into();
        assert!(err.to_string().contains("I/O error"));

        let json_err = serde_json::from_str::<u32>("not json").unwrap_err();
        let err: CacheError = json_err.into();
        assert!(err.to_string().contains("Codec error"));
    }
}
