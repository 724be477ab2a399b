//! Stream Key Codec
//!
//! Stored stream URLs have the shape `<prefix><key>.flv`. `build` and `extract`
//! are inverses: `extract(build(k)) == k` for every non-empty `k`.

use super::{StreamKey, StreamKeyError};

const STREAM_URL_SUFFIX: &str = ".flv";

/// Builds and parses stream URLs under a fixed prefix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamKeyCodec {
    prefix: String,
}

impl StreamKeyCodec {
    /// `prefix` is everything in front of the key, e.g. `http://host/live/livestream/`
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Format `key` into the canonical playable URL
    pub fn build(&self, key: &str) -> Result<String, StreamKeyError> {
        let key = StreamKey::try_from(key)?;
        Ok(format!("{}{}{}", self.prefix, key.as_str(), STREAM_URL_SUFFIX))
    }

    /// Recover the key from a stored URL
    pub fn extract(&self, url: &str) -> Result<StreamKey, StreamKeyError> {
        let key = url
            .strip_prefix(self.prefix.as_str())
            .and_then(|rest| rest.strip_suffix(STREAM_URL_SUFFIX))
            .ok_or_else(|| StreamKeyError::MalformedUrl(url.to_string()))?;

        StreamKey::try_from(key).map_err(|_| StreamKeyError::MalformedUrl(url.to_string()))
    }
}
