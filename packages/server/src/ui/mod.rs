//! Presence server UI layer (HTTP + WebSocket).

mod handler;
mod server;
mod signal;
pub mod state;

pub use server::Server;
pub use state::ConnectionSettings;
