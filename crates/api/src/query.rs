//! Shared query parameter types for API handlers.

use chrono::{Datelike, Utc};
use serde::Deserialize;

/// `?year=&month=` for calendar views. Missing values default to the
/// current UTC month.
#[derive(Debug, Default, Deserialize)]
pub struct MonthParams {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

impl MonthParams {
    /// Requested month, defaulting each missing part to the current UTC month.
    pub fn resolve(&self) -> (i32, u32) {
        let today = Utc::now().date_naive();
        (
            self.year.unwrap_or_else(|| today.year()),
            self.month.unwrap_or_else(|| today.month()),
        )
    }
}

/// `?status=` filter on order lists, matched against the merged status.
#[derive(Debug, Default, Deserialize)]
pub struct StatusFilterParams {
    pub status: Option<String>,
}

/// Default page size for message fetches.
pub const DEFAULT_MESSAGE_LIMIT: i64 = 100;

/// Upper bound on message page size.
pub const MAX_MESSAGE_LIMIT: i64 = 500;
