//! UseCase: Room の presence 取得

use std::sync::Arc;

use crate::domain::{RoomId, RoomPresence, RoomRegistry};

use super::error::GetRoomPresenceError;

/// Room 状態取得のユースケース
pub struct GetRoomPresenceUseCase {
    registry: Arc<dyn RoomRegistry>,
}

impl GetRoomPresenceUseCase {
    pub fn new(registry: Arc<dyn RoomRegistry>) -> Self {
        Self { registry }
    }

    /// アクティブな全 Room
    pub async fn list(&self) -> Vec<RoomPresence> {
        self.registry.rooms().await
    }

    /// 単一 Room の詳細
    pub async fn detail(&self, room_id: RoomId) -> Result<RoomPresence, GetRoomPresenceError> {
        self.registry
            .presence(room_id)
            .await
            .ok_or(GetRoomPresenceError::RoomNotFound(room_id.value()))
    }
}
