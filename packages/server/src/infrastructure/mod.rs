//! Infrastructure layer
//!
//! ドメイン層の port trait の具体的な実装と DTO。

pub mod cache;
pub mod dto;
pub mod inventory;
pub mod repository;
