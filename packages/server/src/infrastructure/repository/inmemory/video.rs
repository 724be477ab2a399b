//! InMemory Video Repository 実装
//!
//! 動画ストア（外部コラボレーター）の読み取り専用スタンドイン。
//! 起動時に JSON ファイル（`[{"id": 1, "stream_url": "..."}]`）から読み込む。

use std::{collections::BTreeMap, path::Path};

use async_trait::async_trait;

use crate::domain::{RepositoryError, Video, VideoId, VideoRepository};

/// インメモリ Video Repository 実装
#[derive(Debug, Default)]
pub struct InMemoryVideoRepository {
    videos: BTreeMap<VideoId, Video>,
}

impl InMemoryVideoRepository {
    pub fn new(videos: impl IntoIterator<Item = Video>) -> Self {
        Self {
            videos: videos.into_iter().map(|v| (v.id, v)).collect(),
        }
    }

    /// JSON 配列から読み込む
    pub fn from_json(json: &str) -> Result<Self, RepositoryError> {
        let videos: Vec<Video> =
            serde_json::from_str(json).map_err(|e| RepositoryError::Load(e.to_string()))?;
        Ok(Self::new(videos))
    }

    /// JSON ファイルから読み込む
    pub async fn from_json_file(path: &Path) -> Result<Self, RepositoryError> {
        let json = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| RepositoryError::Load(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&json)
    }

    pub fn len(&self) -> usize {
        self.videos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.videos.is_empty()
    }
}

#[async_trait]
impl VideoRepository for InMemoryVideoRepository {
    async fn find_video(&self, id: VideoId) -> Result<Option<Video>, RepositoryError> {
        Ok(self.videos.get(&id).cloned())
    }

    async fn list_videos(&self) -> Result<Vec<Video>, RepositoryError> {
        Ok(self.videos.values().cloned().collect())
    }
}
