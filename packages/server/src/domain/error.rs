//! Domain errors

use thiserror::Error;

/// Invalid input rejected at the boundary; no partial state is created.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// Room (video) identifier is absent or zero
    #[error("room id must be a non-zero integer")]
    InvalidRoomId,
}

/// Stream key codec errors
///
/// Both are recoverable: live-status checks downgrade them to "offline".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StreamKeyError {
    #[error("stream key must not be empty")]
    InvalidKey,

    #[error("malformed stream url: '{0}'")]
    MalformedUrl(String),
}

/// The external media server's inventory could not be obtained.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InventoryError {
    /// Connection failure or timeout
    #[error("inventory request failed: {0}")]
    Request(String),

    #[error("inventory endpoint returned status {0}")]
    Status(u16),

    /// Media server answered with a non-zero application code
    #[error("inventory endpoint returned code {0}")]
    Code(i64),

    #[error("failed to decode inventory response: {0}")]
    Decode(String),
}

/// Ephemeral cache errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheError {
    #[error("ttl must be greater than zero")]
    InvalidTtl,

    #[error("failed to serialize cache value: {0}")]
    Serialization(String),
}

/// Delivery failure towards a single connection
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("connection '{0}' is closed")]
    ChannelClosed(String),
}

/// Collaborator store errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("failed to load video store: {0}")]
    Load(String),
}
