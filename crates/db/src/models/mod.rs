//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - `Deserialize` DTOs for inserts and patches where the table is writable
//! - Joined listing rows for views that need names from related tables

pub mod cabinet;
pub mod category;
pub mod inventory_log;
pub mod item;
pub mod product;
pub mod room;
pub mod user;
pub mod verification_code;
