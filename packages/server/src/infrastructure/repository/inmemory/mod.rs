//! In-memory implementations of the domain ports.

pub mod room;
pub mod video;

pub use room::InMemoryRoomRegistry;
pub use video::InMemoryVideoRepository;
