//! Conversion logic between DTOs and domain entities.

use crate::domain::{LiveStream, PresenceUpdate, RoomPresence};
use crate::infrastructure::dto::{http, inventory, websocket};
use roomcast_shared::time::timestamp_to_jst_rfc3339;

// ========================================
// DTO → Domain Entity
// ========================================

impl From<inventory::InventoryStream> for LiveStream {
    fn from(dto: inventory::InventoryStream) -> Self {
        Self { name: dto.name }
    }
}

// ========================================
// Domain Entity → DTO
// ========================================

impl From<PresenceUpdate> for websocket::PresenceMessage {
    fn from(update: PresenceUpdate) -> Self {
        Self {
            r#type: websocket::MessageType::Presence,
            room_id: update.room_id.value(),
            count: update.count,
        }
    }
}

impl From<&RoomPresence> for http::RoomSummaryDto {
    fn from(presence: &RoomPresence) -> Self {
        Self {
            room_id: presence.room_id.value(),
            count: presence.count,
        }
    }
}

impl From<RoomPresence> for http::RoomDetailDto {
    fn from(presence: RoomPresence) -> Self {
        Self {
            room_id: presence.room_id.value(),
            count: presence.count,
            members: presence
                .members
                .into_iter()
                .map(|m| http::MemberDetailDto {
                    client_id: m.client_id.into_string(),
                    connected_at: timestamp_to_jst_rfc3339(m.connected_at.value()),
                })
                .collect(),
        }
    }
}
