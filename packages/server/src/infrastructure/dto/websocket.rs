//! WebSocket message DTOs.

use serde::{Deserialize, Serialize};

/// Message type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MessageType {
    Presence,
}

/// Viewer count of a room, pushed after every join / leave
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceMessage {
    pub r#type: MessageType,
    pub room_id: u64,
    pub count: usize,
}
