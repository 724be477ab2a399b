//! Port trait 定義
//!
//! ドメイン層が必要とする外部とのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use std::time::Duration;

use async_trait::async_trait;

use super::{
    ClientConnection, ConnectionId, LiveStream, RoomId, RoomPresence, Video, VideoId,
    error::{CacheError, InventoryError, RepositoryError},
};

/// Result of removing a connection from a room
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaveOutcome {
    /// The connection was not registered (already left, or the room is absent)
    NotMember,
    /// The connection left; the remaining members received the new count
    Left { remaining: usize },
    /// The last member left and the room entry was removed
    RoomClosed,
}

/// Room Registry
///
/// Room ごとの接続集合を管理する。同じ Room に対する join / leave / broadcast は
/// 互いに原子的に見えなければならないが、異なる Room 同士は独立して進行する。
#[async_trait]
pub trait RoomRegistry: Send + Sync {
    /// 接続を登録し、登録後の人数を Room の全員（新規接続を含む）に配信する
    async fn join(&self, room_id: RoomId, connection: ClientConnection) -> usize;

    /// 接続を削除する（冪等）。空になった Room は削除される
    async fn leave(&self, room_id: RoomId, connection_id: &ConnectionId) -> LeaveOutcome;

    /// 現在の人数を Room の全員に再配信する。Room が存在しなければ None
    async fn broadcast(&self, room_id: RoomId) -> Option<usize>;

    /// 現在の人数（Room が存在しなければ 0）
    async fn count(&self, room_id: RoomId) -> usize;

    /// 単一 Room のスナップショット
    async fn presence(&self, room_id: RoomId) -> Option<RoomPresence>;

    /// 全 Room のスナップショット（room_id 昇順）
    async fn rooms(&self) -> Vec<RoomPresence>;
}

/// Read-only access to the video store collaborator
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VideoRepository: Send + Sync {
    async fn find_video(&self, id: VideoId) -> Result<Option<Video>, RepositoryError>;

    async fn list_videos(&self) -> Result<Vec<Video>, RepositoryError>;
}

/// Live Inventory Client
///
/// One request per call, no caching and no retry.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LiveInventory: Send + Sync {
    async fn fetch_active_streams(&self) -> Result<Vec<LiveStream>, InventoryError>;
}

/// Ephemeral Cache
///
/// Each operation is atomic on its own; get-then-set sequences are not.
#[async_trait]
pub trait EphemeralCache: Send + Sync {
    /// Expired and missing entries are both a miss
    async fn get(&self, key: &str) -> Option<Vec<u8>>;

    /// Overwrites any existing entry. A zero ttl is `CacheError::InvalidTtl`
    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<(), CacheError>;

    async fn del(&self, key: &str);
}
