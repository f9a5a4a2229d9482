//! Typed read/write helpers layered on the byte core.
//!
//! The cache engine stores bytes and nothing else. These helpers encode
//! typed values to bytes on the way in and decode them on the way out;
//! strings round-trip as UTF-8, structured values as JSON. The engine
//! never depends on the encodings, and anything else that can turn itself
//! into bytes can use [`TierCache::write`] and [`TierCache::read`]
//! directly.

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use crate::cache::TierCache;
use crate::error::CacheError;

impl TierCache {
    /// Write a string under `key` as UTF-8 bytes.
    pub async fn write_string(&self, key: &str, value: impl AsRef<str>) {
        self.write(key, Bytes::copy_from_slice(value.as_ref().as_bytes()))
            .await;
    }

    /// Read the entry for `key` as a UTF-8 string.
    ///
    /// Returns `None` when the entry is absent or not valid UTF-8; invalid
    /// bytes are logged and treated as a miss.
    pub async fn read_string(&self, key: &str) -> Option<String> {
        let bytes = self.read(key).await?;
        match String::from_utf8(bytes.to_vec()) {
            Ok(s) => Some(s),
            Err(e) => {
                warn!(key, error = %e, "Cached entry is not valid UTF-8");
                None
            }
        }
    }

    /// Serialize `value` as JSON and write it under `key`.
    pub async fn write_json<T: Serialize>(&self, key: &str, value: &T) -> Result<(), CacheError> {
        let encoded = serde_json::to_vec(value)?;
        self.write(key, encoded).await;
        Ok(())
    }

    /// Read the entry for `key` and deserialize it from JSON.
    ///
    /// Absence is `Ok(None)`. An entry that fails to decode is an error at
    /// this boundary, not a cache miss.
    pub async fn read_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CacheError> {
        match self.read(key).await {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }
}
