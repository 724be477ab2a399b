//! Entities

use serde::{Deserialize, Serialize};

use super::{
    PusherChannel,
    error::MessagePushError,
    value_object::{ClientId, ConnectionId, RoomId, Timestamp, VideoId},
};

/// Video record supplied by the video store
///
/// `stream_url` is empty for videos that never went live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Video {
    pub id: VideoId,
    #[serde(default)]
    pub stream_url: String,
}

impl Video {
    pub fn new(id: VideoId, stream_url: impl Into<String>) -> Self {
        Self {
            id,
            stream_url: stream_url.into(),
        }
    }
}

/// One active stream reported by the media server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveStream {
    pub name: String,
}

/// Viewer count pushed to every member of a room
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresenceUpdate {
    pub room_id: RoomId,
    pub count: usize,
}

/// One real-time session registered in a room
///
/// The registry holds the send handle; the receiving end stays with the
/// connection handler that created it.
#[derive(Debug, Clone)]
pub struct ClientConnection {
    pub id: ConnectionId,
    pub client_id: ClientId,
    pub connected_at: Timestamp,
    sender: PusherChannel,
}

impl ClientConnection {
    pub fn new(client_id: ClientId, sender: PusherChannel, connected_at: Timestamp) -> Self {
        Self {
            id: ConnectionId::generate(),
            client_id,
            connected_at,
            sender,
        }
    }

    /// false once the handler dropped its receiver
    pub fn is_alive(&self) -> bool {
        !self.sender.is_closed()
    }

    /// Non-blocking delivery.
    ///
    /// An update the peer has not read yet is replaced, so a slow reader always
    /// ends up on the newest count.
    pub fn push(&self, update: PresenceUpdate) -> Result<(), MessagePushError> {
        if self.sender.is_closed() {
            return Err(MessagePushError::ChannelClosed(self.id.to_string()));
        }
        self.sender.send_replace(update);
        Ok(())
    }
}

/// Member of a room as exposed by presence queries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomMember {
    pub client_id: ClientId,
    pub connected_at: Timestamp,
}

/// Snapshot of one active room
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomPresence {
    pub room_id: RoomId,
    pub count: usize,
    pub members: Vec<RoomMember>,
}

/// Video partition (category) as cached for listing pages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partition {
    pub id: u32,
    pub content: String,
    /// None for top-level partitions
    pub parent_id: Option<u32>,
}
