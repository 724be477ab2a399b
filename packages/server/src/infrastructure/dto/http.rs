//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

/// Entry of `GET /api/rooms`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSummaryDto {
    pub room_id: u64,
    pub count: usize,
}

/// Member of `GET /api/rooms/{vid}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberDetailDto {
    pub client_id: String,
    /// RFC 3339 (JST)
    pub connected_at: String,
}

/// `GET /api/rooms/{vid}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomDetailDto {
    pub room_id: u64,
    pub count: usize,
    pub members: Vec<MemberDetailDto>,
}

/// `GET /api/video/live?vid=`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveStatusDto {
    pub vid: u64,
    pub live: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveVideoDto {
    pub vid: u64,
    pub url: String,
}

/// `GET /api/video/live/list`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveVideoListDto {
    pub videos: Vec<LiveVideoDto>,
}

/// `GET /api/live/url?key=`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamUrlDto {
    pub url: String,
}
