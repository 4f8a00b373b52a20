//! HTTP payment-intent client.
//!
//! POSTs a JSON intent request with a bearer key. The provider answers
//! `{ "id", "status" }` on success or `{ "error": "<message>" }` when the
//! payment is refused.

use std::time::Duration;

use serde::Deserialize;
use shootdesk_core::status::PaymentAttemptStatus;

use super::{PaymentError, PaymentGateway, PaymentIntent, PaymentRequest};

/// HTTP request timeout for a single intent call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Fallback message when the provider reports a failed intent without text.
const GENERIC_DECLINE: &str = "Payment failed";

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum IntentResponse {
    Intent { id: String, status: String },
    Error { error: String },
}

pub struct HttpPaymentGateway {
    client: reqwest::Client,
    intent_url: String,
    api_key: Option<String>,
}

impl HttpPaymentGateway {
    pub fn new(intent_url: String, api_key: Option<String>) -> Result<Self, PaymentError> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            intent_url,
            api_key,
        })
    }
}

#[async_trait::async_trait]
impl PaymentGateway for HttpPaymentGateway {
    async fn create_payment_intent(
        &self,
        request: &PaymentRequest,
    ) -> Result<PaymentIntent, PaymentError> {
        let mut builder = self.client.post(&self.intent_url).json(request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());

        let result = interpret_response(status, &body);
        match &result {
            Ok(intent) => tracing::info!(
                order_id = request.order_id,
                intent_id = %intent.id,
                status = %intent.status,
                "Payment intent created"
            ),
            Err(e) => tracing::warn!(order_id = request.order_id, error = %e, "Payment intent failed"),
        }
        result
    }
}

/// Turn a provider response into an intent or a typed error.
///
/// Client errors (4xx) and `{ "error" }` bodies are declines; server
/// errors and unparseable bodies are gateway errors.
fn interpret_response(status: u16, body: &str) -> Result<PaymentIntent, PaymentError> {
    let parsed = serde_json::from_str::<IntentResponse>(body).ok();
    let gateway_error = || PaymentError::Gateway {
        status,
        body: body.to_string(),
    };

    if status >= 500 {
        return Err(gateway_error());
    }

    match parsed {
        Some(IntentResponse::Error { error }) => Err(PaymentError::Declined(error)),
        Some(IntentResponse::Intent { id, status: intent_status }) if status < 300 => {
            let attempt: PaymentAttemptStatus =
                intent_status.parse().map_err(|_| gateway_error())?;
            if attempt == PaymentAttemptStatus::Failed {
                return Err(PaymentError::Declined(GENERIC_DECLINE.into()));
            }
            Ok(PaymentIntent { id, status: attempt })
        }
        _ if (400..500).contains(&status) => Err(PaymentError::Declined(GENERIC_DECLINE.into())),
        _ => Err(gateway_error()),
    }
}
