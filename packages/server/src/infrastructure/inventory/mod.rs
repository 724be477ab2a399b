//! Live Inventory Client implementations
//!
//! - `http`: media server HTTP API (`GET /api/v1/streams`)

pub mod http;

pub use http::HttpLiveInventory;
