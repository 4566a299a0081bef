//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - A create DTO for inserts
//! - An update DTO (all `Option` fields) for patches, where the entity
//!   is mutable

pub mod collection;
pub mod environment;
pub mod history;
pub mod refresh_token;
pub mod request;
pub mod user;
