//! Server state.

use std::{sync::Arc, time::Duration};

use crate::{
    domain::StreamKeyCodec,
    usecase::{CheckLiveStatusUseCase, GetRoomPresenceUseCase, JoinRoomUseCase},
};

/// Per-connection websocket settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionSettings {
    /// Bound of a single websocket write
    pub write_timeout: Duration,
    /// Interval between pings sent to the peer
    pub heartbeat_interval: Duration,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            write_timeout: Duration::from_secs(5),
            heartbeat_interval: Duration::from_secs(30),
        }
    }
}

/// Shared application state
pub struct AppState {
    /// JoinRoomUseCase（Room 参加のユースケース）
    pub join_room_usecase: Arc<JoinRoomUseCase>,
    /// CheckLiveStatusUseCase（ライブ判定のユースケース）
    pub check_live_status_usecase: Arc<CheckLiveStatusUseCase>,
    /// GetRoomPresenceUseCase（Room 状態取得のユースケース）
    pub get_room_presence_usecase: Arc<GetRoomPresenceUseCase>,
    /// 再生 URL の組み立て用
    pub codec: StreamKeyCodec,
    pub connection: ConnectionSettings,
}
