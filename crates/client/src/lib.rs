//! HTTP client for the ShootDesk portal API.
//!
//! [`PortalClient`] wraps the agent-facing endpoints; [`Poller`] re-fetches
//! on a fixed interval so a UI can stay current without push updates.

pub mod client;
pub mod error;
pub mod poller;
pub mod types;

pub use client::PortalClient;
pub use error::ClientError;
pub use poller::Poller;
