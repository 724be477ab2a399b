//! Upload ownership cache
//!
//! Records which user uploaded an asset (e.g. a cover image URL) so that a
//! later request referencing the asset can be authorized within the TTL window.

use std::{sync::Arc, time::Duration};

use crate::domain::{CacheError, EphemeralCache, UserId};

const UPLOAD_KEY_PREFIX: &str = "upload:";

/// Default window in which an uploaded asset can be claimed
pub const DEFAULT_UPLOAD_TTL: Duration = Duration::from_secs(60 * 60);

pub struct UploadOwnershipCache {
    cache: Arc<dyn EphemeralCache>,
    ttl: Duration,
}

impl UploadOwnershipCache {
    pub fn new(cache: Arc<dyn EphemeralCache>, ttl: Duration) -> Self {
        Self { cache, ttl }
    }

    fn key(asset: &str) -> String {
        format!("{UPLOAD_KEY_PREFIX}{asset}")
    }

    pub async fn record(&self, asset: &str, uploader: UserId) -> Result<(), CacheError> {
        self.cache
            .set(&Self::key(asset), uploader.to_string().into_bytes(), self.ttl)
            .await
    }

    pub async fn uploader(&self, asset: &str) -> Option<UserId> {
        let bytes = self.cache.get(&Self::key(asset)).await?;
        std::str::from_utf8(&bytes).ok()?.parse().ok()
    }

    /// true only while the claim recorded for `asset` belongs to `user`
    pub async fn is_uploaded_by(&self, asset: &str, user: UserId) -> bool {
        self.uploader(asset).await == Some(user)
    }

    pub async fn forget(&self, asset: &str) {
        self.cache.del(&Self::key(asset)).await;
    }
}
