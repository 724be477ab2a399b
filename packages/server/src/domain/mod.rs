//! Domain layer
//!
//! 値オブジェクト、エンティティ、エラー、そして Infrastructure 層が実装する
//! port trait（RoomRegistry, VideoRepository, LiveInventory, EphemeralCache）を定義します。

pub mod entity;
pub mod error;
pub mod repository;
pub mod stream_key;
pub mod value_object;

pub use entity::{
    ClientConnection, LiveStream, Partition, PresenceUpdate, RoomMember, RoomPresence, Video,
};
pub use error::{
    CacheError, DomainError, InventoryError, MessagePushError, RepositoryError, StreamKeyError,
};
pub use repository::{EphemeralCache, LeaveOutcome, LiveInventory, RoomRegistry, VideoRepository};
pub use stream_key::StreamKeyCodec;
pub use value_object::{ClientId, ConnectionId, RoomId, StreamKey, Timestamp, UserId, VideoId};

/// クライアントへ presence 更新を届けるチャンネル
///
/// キューではなく最新値のみを保持する。未読の更新は新しい人数で上書きされる。
pub type PusherChannel = tokio::sync::watch::Sender<PresenceUpdate>;
