//! Data Transfer Objects for REST response serialization.

pub mod connection_dto;
pub mod system_dto;

pub use connection_dto::*;
pub use system_dto::*;
