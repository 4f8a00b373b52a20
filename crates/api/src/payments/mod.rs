//! Payment intents.
//!
//! Handlers talk to a [`PaymentGateway`]; production uses
//! [`http::HttpPaymentGateway`] and deployments without credentials get
//! [`DisabledPaymentGateway`]. Nothing here retries.

pub mod http;

use std::sync::Arc;

use serde::Serialize;
use shootdesk_core::status::PaymentAttemptStatus;
use shootdesk_core::types::{Cents, DbId};

/// Default ISO currency code sent with intents.
const DEFAULT_CURRENCY: &str = "usd";

/// Payment gateway settings.
#[derive(Debug, Clone)]
pub struct PaymentConfig {
    /// Endpoint that creates payment intents. `None` disables payments.
    pub intent_url: Option<String>,
    /// Bearer key sent to the endpoint.
    pub api_key: Option<String>,
    pub currency: String,
}

impl PaymentConfig {
    /// Load from `PAYMENT_INTENT_URL`, `PAYMENT_API_KEY`, `PAYMENT_CURRENCY`.
    pub fn from_env() -> Self {
        let non_empty = |key: &str| std::env::var(key).ok().filter(|v| !v.trim().is_empty());
        Self {
            intent_url: non_empty("PAYMENT_INTENT_URL"),
            api_key: non_empty("PAYMENT_API_KEY"),
            currency: non_empty("PAYMENT_CURRENCY").unwrap_or_else(|| DEFAULT_CURRENCY.into()),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.intent_url.is_some()
    }

    pub fn disabled() -> Self {
        Self {
            intent_url: None,
            api_key: None,
            currency: DEFAULT_CURRENCY.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    /// No gateway endpoint is configured.
    #[error("Payment gateway is not configured")]
    NotConfigured,

    /// The provider refused the payment; the message is safe to show users.
    #[error("Payment declined: {0}")]
    Declined(String),

    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider answered with something other than an intent or a decline.
    #[error("Payment gateway error ({status}): {body}")]
    Gateway { status: u16, body: String },
}

/// What the handler asks the gateway to charge.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentRequest {
    pub amount_cents: Cents,
    pub currency: String,
    pub payment_method_ref: String,
    pub order_id: DbId,
    pub agent_id: DbId,
}

/// A created payment intent.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentIntent {
    pub id: String,
    pub status: PaymentAttemptStatus,
}

#[async_trait::async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_payment_intent(
        &self,
        request: &PaymentRequest,
    ) -> Result<PaymentIntent, PaymentError>;
}

/// Gateway used when no endpoint is configured. Every call fails with
/// [`PaymentError::NotConfigured`].
pub struct DisabledPaymentGateway;

#[async_trait::async_trait]
impl PaymentGateway for DisabledPaymentGateway {
    async fn create_payment_intent(
        &self,
        _request: &PaymentRequest,
    ) -> Result<PaymentIntent, PaymentError> {
        Err(PaymentError::NotConfigured)
    }
}

/// Pick the gateway for the given configuration.
pub fn build_gateway(config: &PaymentConfig) -> Result<Arc<dyn PaymentGateway>, PaymentError> {
    match &config.intent_url {
        Some(url) => Ok(Arc::new(http::HttpPaymentGateway::new(
            url.clone(),
            config.api_key.clone(),
        )?)),
        None => {
            tracing::warn!("PAYMENT_INTENT_URL not set, payments are disabled");
            Ok(Arc::new(DisabledPaymentGateway))
        }
    }
}
