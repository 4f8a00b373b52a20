//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches
//!
//! SMALLINT status columns decode straight into the `shootdesk_core::status`
//! enums via `#[sqlx(try_from = "i16")]`.

pub mod deliverable;
pub mod message;
pub mod order;
pub mod payment;
pub mod property;
pub mod service_pricing;
pub mod session;
pub mod user;
