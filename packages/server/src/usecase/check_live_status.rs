//! UseCase: ライブ状態の判定（Live-Status Correlator）
//!
//! 動画に保存されたストリーム URL からキーを取り出し、メディアサーバーの
//! 現在のインベントリと完全一致で照合する。結果はキャッシュしない。
//! キーの不正やインベントリ取得失敗はすべて「オフライン」に落とす。

use std::sync::Arc;

use crate::domain::{
    LiveInventory, LiveStream, StreamKey, StreamKeyCodec, Video, VideoId, VideoRepository,
};

use super::error::LiveStatusError;

/// ライブ判定のユースケース
pub struct CheckLiveStatusUseCase {
    videos: Arc<dyn VideoRepository>,
    inventory: Arc<dyn LiveInventory>,
    codec: StreamKeyCodec,
}

impl CheckLiveStatusUseCase {
    pub fn new(
        videos: Arc<dyn VideoRepository>,
        inventory: Arc<dyn LiveInventory>,
        codec: StreamKeyCodec,
    ) -> Self {
        Self {
            videos,
            inventory,
            codec,
        }
    }

    /// 動画が現在ライブ配信中か
    ///
    /// ストリーム URL が空、キーが取り出せない、インベントリが取得できない場合は false。
    pub async fn is_live(&self, video: &Video) -> bool {
        let Some(key) = self.stream_key(video) else {
            return false;
        };

        match self.fetch_inventory().await {
            Some(streams) => has_stream(&streams, &key),
            None => false,
        }
    }

    /// 取得済みのインベントリに対して判定する（名前の完全一致）
    pub fn is_live_in(&self, video: &Video, streams: &[LiveStream]) -> bool {
        self.stream_key(video).is_some_and(|key| has_stream(streams, &key))
    }

    /// ライブ中の動画だけを残す。インベントリの取得はバッチ全体で 1 回
    pub async fn filter_live(&self, videos: Vec<Video>) -> Vec<Video> {
        let candidates: Vec<(Video, StreamKey)> = videos
            .into_iter()
            .filter_map(|video| {
                let key = self.stream_key(&video)?;
                Some((video, key))
            })
            .collect();
        if candidates.is_empty() {
            return Vec::new();
        }

        let Some(streams) = self.fetch_inventory().await else {
            return Vec::new();
        };
        candidates
            .into_iter()
            .filter(|(_, key)| has_stream(&streams, key))
            .map(|(video, _)| video)
            .collect()
    }

    /// 動画 ID でライブ判定する
    pub async fn is_video_live(&self, id: VideoId) -> Result<bool, LiveStatusError> {
        let video = self
            .videos
            .find_video(id)
            .await?
            .ok_or(LiveStatusError::VideoNotFound(id.value()))?;
        Ok(self.is_live(&video).await)
    }

    /// 動画ストア内のライブ中の動画一覧
    pub async fn list_live_videos(&self) -> Result<Vec<Video>, LiveStatusError> {
        let videos = self.videos.list_videos().await?;
        Ok(self.filter_live(videos).await)
    }

    /// 空の URL は配信されたことのない動画。警告は出さない
    fn stream_key(&self, video: &Video) -> Option<StreamKey> {
        if video.stream_url.is_empty() {
            return None;
        }
        match self.codec.extract(&video.stream_url) {
            Ok(key) => Some(key),
            Err(e) => {
                tracing::warn!("Video {} treated as offline: {}", video.id, e);
                None
            }
        }
    }

    async fn fetch_inventory(&self) -> Option<Vec<LiveStream>> {
        match self.inventory.fetch_active_streams().await {
            Ok(streams) => Some(streams),
            Err(e) => {
                tracing::warn!("Live inventory unavailable, reporting offline: {}", e);
                None
            }
        }
    }
}

fn has_stream(streams: &[LiveStream], key: &StreamKey) -> bool {
    streams.iter().any(|s| s.name == key.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        InventoryError, RepositoryError,
        repository::{MockLiveInventory, MockVideoRepository},
    };

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - 空 URL / 不正 URL / インベントリ取得失敗がすべてオフラインになること
    // - キーと name の完全一致（大文字小文字区別、部分一致なし）
    // - 一覧のフィルタでインベントリ取得が 1 回だけであること
    // ========================================

    const PREFIX: &str = "http://host/live/livestream/";

    fn vid(id: u64) -> VideoId {
        VideoId::new(id).unwrap()
    }

    fn stream(name: &str) -> LiveStream {
        LiveStream {
            name: name.to_string(),
        }
    }

    fn inventory_returning(names: &'static [&'static str], times: usize) -> MockLiveInventory {
        let mut inventory = MockLiveInventory::new();
        inventory
            .expect_fetch_active_streams()
            .times(times)
            .returning(move || Ok(names.iter().map(|n| stream(n)).collect()));
        inventory
    }

    fn create_usecase(
        videos: MockVideoRepository,
        inventory: MockLiveInventory,
    ) -> CheckLiveStatusUseCase {
        CheckLiveStatusUseCase::new(
            Arc::new(videos),
            Arc::new(inventory),
            StreamKeyCodec::new(PREFIX),
        )
    }

    #[tokio::test]
    async fn test_is_live_when_key_in_inventory() {
        // テスト項目: インベントリにキーと同名のストリームがあればライブ
        // given (前提条件):
        let usecase = create_usecase(
            MockVideoRepository::new(),
            inventory_returning(&["abc123", "zzz"], 1),
        );
        let video = Video::new(vid(1), "http://host/live/livestream/abc123.flv");

        // when (操作):
        let live = usecase.is_live(&video).await;

        // then (期待する結果):
        assert!(live);
    }

    #[tokio::test]
    async fn test_is_not_live_when_key_missing() {
        // テスト項目: インベントリにキーがなければオフライン
        // given (前提条件):
        let usecase = create_usecase(MockVideoRepository::new(), inventory_returning(&["zzz"], 1));
        let video = Video::new(vid(1), "http://host/live/livestream/abc123.flv");

        // when (操作):
        let live = usecase.is_live(&video).await;

        // then (期待する結果):
        assert!(!live);
    }

    #[tokio::test]
    async fn test_empty_url_skips_inventory() {
        // テスト項目: 空の URL は即オフライン。インベントリは取得しない
        // given (前提条件):
        let usecase = create_usecase(
            MockVideoRepository::new(),
            inventory_returning(&["abc123"], 0),
        );
        let video = Video::new(vid(1), "");

        // when (操作):
        let live = usecase.is_live(&video).await;

        // then (期待する結果):
        assert!(!live);
    }

    #[tokio::test]
    async fn test_malformed_url_is_offline() {
        // テスト項目: プレフィックスが異なる URL はオフライン（エラーは伝播しない）
        // given (前提条件):
        let usecase = create_usecase(
            MockVideoRepository::new(),
            inventory_returning(&["abc123"], 0),
        );
        let video = Video::new(vid(1), "rtmp://legacy/abc123");

        // when (操作):
        let live = usecase.is_live(&video).await;

        // then (期待する結果):
        assert!(!live);
    }

    #[tokio::test]
    async fn test_inventory_failure_is_offline() {
        // テスト項目: インベントリ取得がタイムアウトしてもオフラインを返すだけ
        // given (前提条件):
        let mut inventory = MockLiveInventory::new();
        inventory
            .expect_fetch_active_streams()
            .times(1)
            .returning(|| Err(InventoryError::Request("operation timed out".to_string())));
        let usecase = create_usecase(MockVideoRepository::new(), inventory);
        let video = Video::new(vid(1), "http://host/live/livestream/abc123.flv");

        // when (操作):
        let live = usecase.is_live(&video).await;

        // then (期待する結果):
        assert!(!live);
    }

    #[tokio::test]
    async fn test_match_is_exact() {
        // テスト項目: 大文字小文字の違いや部分一致はライブ扱いしない
        // given (前提条件):
        let usecase = create_usecase(MockVideoRepository::new(), MockLiveInventory::new());
        let video = Video::new(vid(1), "http://host/live/livestream/abc123.flv");
        let streams = [stream("ABC123"), stream("abc1234"), stream("abc12"), stream("c123")];

        // when (操作):
        let live = usecase.is_live_in(&video, &streams);

        // then (期待する結果):
        assert!(!live);
    }

    #[test]
    fn test_is_live_in_fetched_inventory() {
        // テスト項目: 取得済みインベントリでの判定。空 URL や不正 URL はオフライン
        // given (前提条件):
        let usecase = create_usecase(MockVideoRepository::new(), MockLiveInventory::new());
        let streams = [stream("abc123")];
        let stored = Video::new(vid(1), format!("{PREFIX}abc123.flv"));

        // when (操作):
        let live = usecase.is_live_in(&stored, &streams);
        let empty = usecase.is_live_in(&Video::new(vid(2), ""), &streams);
        let malformed = usecase.is_live_in(&Video::new(vid(3), "abc123"), &streams);

        // then (期待する結果):
        assert!(live);
        assert!(!empty);
        assert!(!malformed);
    }

    #[tokio::test]
    async fn test_filter_live_fetches_once() {
        // テスト項目: 複数動画のフィルタでもインベントリ取得は 1 回
        // given (前提条件):
        let usecase = create_usecase(
            MockVideoRepository::new(),
            inventory_returning(&["a", "c"], 1),
        );
        let videos = vec![
            Video::new(vid(1), "http://host/live/livestream/a.flv"),
            Video::new(vid(2), "http://host/live/livestream/b.flv"),
            Video::new(vid(3), "http://host/live/livestream/c.flv"),
            Video::new(vid(4), ""),
            Video::new(vid(5), "garbage"),
        ];

        // when (操作):
        let live = usecase.filter_live(videos).await;

        // then (期待する結果):
        let ids: Vec<u64> = live.iter().map(|v| v.id.value()).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[tokio::test]
    async fn test_filter_live_without_candidates_skips_inventory() {
        // テスト項目: キーを持つ動画がなければインベントリを取得しない
        // given (前提条件):
        let usecase = create_usecase(MockVideoRepository::new(), inventory_returning(&["a"], 0));
        let videos = vec![Video::new(vid(1), ""), Video::new(vid(2), "")];

        // when (操作):
        let live = usecase.filter_live(videos).await;

        // then (期待する結果):
        assert!(live.is_empty());
    }

    #[tokio::test]
    async fn test_is_video_live_unknown_video() {
        // テスト項目: 存在しない動画は VideoNotFound
        // given (前提条件):
        let mut videos = MockVideoRepository::new();
        videos.expect_find_video().returning(|_| Ok(None));
        let usecase = create_usecase(videos, inventory_returning(&[], 0));

        // when (操作):
        let result = usecase.is_video_live(vid(99)).await;

        // then (期待する結果):
        assert_eq!(result, Err(LiveStatusError::VideoNotFound(99)));
    }

    #[tokio::test]
    async fn test_list_live_videos_from_repository() {
        // テスト項目: 動画ストアの一覧からライブ中の動画だけが返る
        // given (前提条件):
        let mut videos = MockVideoRepository::new();
        videos.expect_list_videos().times(1).returning(|| {
            Ok(vec![
                Video::new(VideoId::new(1).unwrap(), "http://host/live/livestream/abc123.flv"),
                Video::new(VideoId::new(2).unwrap(), "http://host/live/livestream/other.flv"),
            ])
        });
        let usecase = create_usecase(videos, inventory_returning(&["abc123"], 1));

        // when (操作):
        let live = usecase.list_live_videos().await.unwrap();

        // then (期待する結果):
        assert_eq!(live.len(), 1);
        assert_eq!(live[0].id.value(), 1);
    }

    #[tokio::test]
    async fn test_list_live_videos_repository_error() {
        // テスト項目: 動画ストアのエラーは伝播する
        // given (前提条件):
        let mut videos = MockVideoRepository::new();
        videos
            .expect_list_videos()
            .returning(|| Err(RepositoryError::Load("offline".to_string())));
        let usecase = create_usecase(videos, inventory_returning(&[], 0));

        // when (操作):
        let result = usecase.list_live_videos().await;

        // then (期待する結果):
        assert!(matches!(result, Err(LiveStatusError::Repository(_))));
    }
}
