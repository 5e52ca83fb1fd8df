//! Domain model structs and DTOs.
//!
//! Each submodule contains a `FromRow` + `Serialize` entity struct
//! matching the database row plus the DTOs the handlers need.

pub mod task;
