//! UseCase errors

use thiserror::Error;

use crate::domain::RepositoryError;

/// 動画単位のライブ判定エラー
///
/// 判定自体は失敗しない（不明はオフライン扱い）。失敗するのは動画の参照のみ。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LiveStatusError {
    #[error("video {0} not found")]
    VideoNotFound(u64),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Room 状態取得のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GetRoomPresenceError {
    #[error("room {0} not found")]
    RoomNotFound(u64),
}
