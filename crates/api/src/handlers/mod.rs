pub mod admin;
pub mod auth;
pub mod billing;
pub mod dashboard;
pub mod messages;
pub mod orders;
pub mod profile;
pub mod properties;
pub mod services;
