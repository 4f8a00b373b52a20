//! Deliverable (finished asset) model and DTOs.

use serde::{Deserialize, Serialize};
use shootdesk_core::error::CoreError;
use shootdesk_core::status::AssetKind;
use shootdesk_core::types::{DbId, Timestamp};
use shootdesk_core::validation::{require_http_url, require_non_blank};
use sqlx::FromRow;

/// A row from the `deliverables` table.
///
/// Also `Deserialize` because deliverable lists are stored in the asset
/// override cache file.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Deliverable {
    pub id: DbId,
    pub order_id: DbId,
    #[sqlx(rename = "kind_id", try_from = "i16")]
    pub kind: AssetKind,
    pub label: String,
    pub url: String,
    pub service_name: String,
    pub created_at: Timestamp,
}

/// DTO for attaching a deliverable to an order (order id comes from the path).
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDeliverable {
    pub kind: AssetKind,
    pub label: String,
    pub url: String,
    pub service_name: String,
}

impl CreateDeliverable {
    pub fn validate(&self) -> Result<(), CoreError> {
        require_non_blank("label", &self.label)?;
        require_non_blank("service_name", &self.service_name)?;
        require_http_url("url", &self.url)
    }
}
