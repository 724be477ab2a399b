//! Utilities shared by the Roomcast crates.

pub mod logger;
pub mod time;
