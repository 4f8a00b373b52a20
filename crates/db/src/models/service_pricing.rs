//! Service catalog model and DTOs.

use serde::{Deserialize, Serialize};
use shootdesk_core::error::CoreError;
use shootdesk_core::pricing::{PricedService, MAX_SERVICE_PRICE_CENTS};
use shootdesk_core::types::{Cents, DbId, Timestamp};
use shootdesk_core::validation::{require_at_most, require_non_blank, require_non_negative};
use sqlx::FromRow;

/// A row from the `service_pricing` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ServicePricing {
    pub id: DbId,
    pub name: String,
    pub base_price_cents: Cents,
    pub description: String,
    pub features: Vec<String>,
    pub active: bool,
    pub sort_order: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl PricedService for ServicePricing {
    fn name(&self) -> &str {
        &self.name
    }

    fn base_price_cents(&self) -> Cents {
        self.base_price_cents
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

/// DTO for adding a service to the catalog.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateServicePricing {
    pub name: String,
    pub base_price_cents: Cents,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub features: Vec<String>,
    pub sort_order: Option<i32>,
}

impl CreateServicePricing {
    pub fn validate(&self) -> Result<(), CoreError> {
        require_non_blank("name", &self.name)?;
        validate_price(self.base_price_cents)
    }
}

/// DTO for editing a catalog entry. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateServicePricing {
    pub name: Option<String>,
    pub base_price_cents: Option<Cents>,
    pub description: Option<String>,
    pub features: Option<Vec<String>>,
    pub active: Option<bool>,
    pub sort_order: Option<i32>,
}

impl UpdateServicePricing {
    pub fn validate(&self) -> Result<(), CoreError> {
        if let Some(name) = &self.name {
            require_non_blank("name", name)?;
        }
        if let Some(price) = self.base_price_cents {
            validate_price(price)?;
        }
        Ok(())
    }
}

fn validate_price(cents: Cents) -> Result<(), CoreError> {
    require_non_negative("base_price_cents", cents)?;
    require_at_most("base_price_cents", cents, MAX_SERVICE_PRICE_CENTS)
}
