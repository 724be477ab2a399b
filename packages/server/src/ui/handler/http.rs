//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;

use crate::{
    domain::VideoId,
    infrastructure::dto::http::{
        LiveStatusDto, LiveVideoDto, LiveVideoListDto, RoomDetailDto, RoomSummaryDto, StreamUrlDto,
    },
    ui::state::AppState,
    usecase::{GetRoomPresenceError, LiveStatusError},
};

/// Query parameters of `GET /api/video/live`
#[derive(Debug, Deserialize)]
pub struct LiveStatusQuery {
    pub vid: Option<u64>,
}

/// Query parameters of `GET /api/live/url`
#[derive(Debug, Deserialize)]
pub struct StreamUrlQuery {
    #[serde(default)]
    pub key: String,
}

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Get presence summary of every active room
pub async fn get_rooms(State(state): State<Arc<AppState>>) -> Json<Vec<RoomSummaryDto>> {
    let rooms = state.get_room_presence_usecase.list().await;
    Json(rooms.iter().map(RoomSummaryDto::from).collect())
}

/// Get presence detail of one room
pub async fn get_room_detail(
    State(state): State<Arc<AppState>>,
    Path(vid): Path<u64>,
) -> Result<Json<RoomDetailDto>, StatusCode> {
    let room_id = VideoId::new(vid).map_err(|_| StatusCode::BAD_REQUEST)?;

    match state.get_room_presence_usecase.detail(room_id).await {
        Ok(presence) => Ok(Json(presence.into())),
        Err(GetRoomPresenceError::RoomNotFound(_)) => Err(StatusCode::NOT_FOUND),
    }
}

/// Whether one video is currently live
pub async fn get_live_status(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LiveStatusQuery>,
) -> Result<Json<LiveStatusDto>, StatusCode> {
    let Some(Ok(vid)) = query.vid.map(VideoId::new) else {
        tracing::warn!("Live status requested without a valid vid");
        return Err(StatusCode::BAD_REQUEST);
    };

    match state.check_live_status_usecase.is_video_live(vid).await {
        Ok(live) => Ok(Json(LiveStatusDto {
            vid: vid.value(),
            live,
        })),
        Err(LiveStatusError::VideoNotFound(_)) => Err(StatusCode::NOT_FOUND),
        Err(LiveStatusError::Repository(e)) => {
            tracing::error!("Failed to load video {}: {}", vid, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Every stored video that is currently live
pub async fn get_live_videos(
    State(state): State<Arc<AppState>>,
) -> Result<Json<LiveVideoListDto>, StatusCode> {
    match state.check_live_status_usecase.list_live_videos().await {
        Ok(videos) => Ok(Json(LiveVideoListDto {
            videos: videos
                .into_iter()
                .map(|v| LiveVideoDto {
                    vid: v.id.value(),
                    url: v.stream_url,
                })
                .collect(),
        })),
        Err(e) => {
            tracing::error!("Failed to list live videos: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Playable URL for a stream key
pub async fn get_stream_url(
    State(state): State<Arc<AppState>>,
    Query(query): Query<StreamUrlQuery>,
) -> Result<Json<StreamUrlDto>, StatusCode> {
    match state.codec.build(&query.key) {
        Ok(url) => Ok(Json(StreamUrlDto { url })),
        Err(e) => {
            tracing::warn!("Rejected stream url request: {}", e);
            Err(StatusCode::BAD_REQUEST)
        }
    }
}
