//! Data Transfer Objects (DTOs).
//!
//! DTOs are organized by protocol:
//! - `websocket`: WebSocket message DTOs
//! - `http`: HTTP API response DTOs
//! - `inventory`: media server inventory response DTOs

pub mod conversion;
pub mod http;
pub mod inventory;
pub mod websocket;
