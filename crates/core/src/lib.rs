//! Domain logic shared by the ShootDesk API, repository layer, and client.
//!
//! This crate has zero internal dependencies: status lookup tables, the
//! order timeline, pricing, derived dashboard views, input validation, and
//! the override cache all live here so both server and client code can use
//! them.

pub mod calendar;
pub mod error;
pub mod overrides;
pub mod pricing;
pub mod roles;
pub mod stats;
pub mod status;
pub mod timeline;
pub mod types;
pub mod validation;
