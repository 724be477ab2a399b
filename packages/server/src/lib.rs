//! Room presence tracking and live-stream status server.
//!
//! Viewers of a video hold a WebSocket connection to the video's room and are
//! pushed the room's viewer count whenever someone joins or leaves. Whether a
//! video is live is decided by matching its stored stream URL against the
//! media server's current inventory.

pub mod config;

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
