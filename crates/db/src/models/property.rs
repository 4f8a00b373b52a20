//! Property listing model and DTOs.

use serde::{Deserialize, Serialize};
use shootdesk_core::error::CoreError;
use shootdesk_core::status::PropertyStatus;
use shootdesk_core::types::{Cents, DbId, Timestamp};
use shootdesk_core::validation::{require_http_url, require_non_blank, require_non_negative};
use sqlx::FromRow;

/// A row from the `properties` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Property {
    pub id: DbId,
    pub agent_id: DbId,
    pub address: String,
    #[sqlx(rename = "status_id", try_from = "i16")]
    pub status: PropertyStatus,
    pub beds: Option<i32>,
    pub baths: Option<f64>,
    pub sqft: Option<i32>,
    pub price_cents: Option<Cents>,
    pub mls_number: Option<String>,
    pub thumbnail_url: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new listing. The owning agent comes from the caller.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProperty {
    pub address: String,
    /// Defaults to `active` if omitted.
    pub status: Option<PropertyStatus>,
    pub beds: Option<i32>,
    pub baths: Option<f64>,
    pub sqft: Option<i32>,
    pub price_cents: Option<Cents>,
    pub mls_number: Option<String>,
    pub thumbnail_url: Option<String>,
}

impl CreateProperty {
    pub fn validate(&self) -> Result<(), CoreError> {
        require_non_blank("address", &self.address)?;
        validate_numbers(self.beds, self.baths, self.sqft, self.price_cents)?;
        if let Some(url) = &self.thumbnail_url {
            require_http_url("thumbnail_url", url)?;
        }
        Ok(())
    }
}

/// DTO for updating an existing listing. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProperty {
    pub address: Option<String>,
    pub status: Option<PropertyStatus>,
    pub beds: Option<i32>,
    pub baths: Option<f64>,
    pub sqft: Option<i32>,
    pub price_cents: Option<Cents>,
    pub mls_number: Option<String>,
    pub thumbnail_url: Option<String>,
}

impl UpdateProperty {
    pub fn validate(&self) -> Result<(), CoreError> {
        if let Some(address) = &self.address {
            require_non_blank("address", address)?;
        }
        validate_numbers(self.beds, self.baths, self.sqft, self.price_cents)?;
        if let Some(url) = &self.thumbnail_url {
            require_http_url("thumbnail_url", url)?;
        }
        Ok(())
    }
}

fn validate_numbers(
    beds: Option<i32>,
    baths: Option<f64>,
    sqft: Option<i32>,
    price_cents: Option<Cents>,
) -> Result<(), CoreError> {
    if let Some(beds) = beds {
        require_non_negative("beds", beds.into())?;
    }
    if let Some(sqft) = sqft {
        require_non_negative("sqft", sqft.into())?;
    }
    if let Some(price) = price_cents {
        require_non_negative("price_cents", price)?;
    }
    if baths.is_some_and(|b| !b.is_finite() || b < 0.0) {
        return Err(CoreError::Validation(
            "baths must be a non-negative number".into(),
        ));
    }
    Ok(())
}
