//! Request handlers.

mod http;
mod websocket;

pub use http::{
    get_live_status, get_live_videos, get_room_detail, get_rooms, get_stream_url, health_check,
};
pub use websocket::websocket_handler;
