//! Media server inventory DTOs.
//!
//! Only `name` is read from each stream; every other reported field (bitrate,
//! codec, client counts, ...) is ignored so new fields never break decoding.

use serde::Deserialize;

/// Body of `GET /api/v1/streams`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InventoryResponse {
    /// Application status code, 0 on success
    #[serde(default)]
    pub code: i64,
    pub streams: Vec<InventoryStream>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InventoryStream {
    pub name: String,
}
