//! Ephemeral Cache and the typed caches built on top of it.

pub mod inmemory;
pub mod partition;
pub mod upload;

pub use inmemory::InMemoryEphemeralCache;
pub use partition::PartitionCache;
pub use upload::UploadOwnershipCache;
