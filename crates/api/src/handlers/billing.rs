//! Billing handlers: payment history, summary, and paying for an order.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use shootdesk_core::error::CoreError;
use shootdesk_core::pricing::format_usd;
use shootdesk_core::status::{OrderStatus, PaymentAttemptStatus, PaymentStatus};
use shootdesk_core::types::{Cents, DbId};
use shootdesk_core::validation::require_non_blank;
use shootdesk_db::models::payment::{CreatePayment, Payment};
use shootdesk_db::repositories::{OrderRepo, PaymentRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::orders::load_view;
use crate::middleware::auth::AuthUser;
use crate::overrides::OrderView;
use crate::payments::{PaymentError, PaymentRequest};
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /billing/payment-intents`.
#[derive(Debug, Deserialize)]
pub struct CreatePaymentIntentRequest {
    pub order_id: DbId,
    /// Provider reference of the card or payment method to charge.
    pub payment_method_ref: String,
}

/// Result of a successful (or pending) payment attempt.
#[derive(Debug, Serialize)]
pub struct PaymentOutcome {
    pub payment: Payment,
    pub order: OrderView,
}

/// Totals shown on the billing page.
#[derive(Debug, Default, PartialEq, Eq, Serialize)]
pub struct BillingSummary {
    pub paid_cents: Cents,
    pub paid_display: String,
    pub outstanding_cents: Cents,
    pub outstanding_display: String,
    pub paid_orders: i64,
    pub unpaid_orders: i64,
}

impl BillingSummary {
    /// Totals over merged order views. Cancelled and refunded orders count
    /// toward neither bucket.
    pub fn compute(orders: &[OrderView]) -> Self {
        let mut summary = BillingSummary::default();
        for view in orders {
            let o = &view.order;
            match o.payment_status {
                PaymentStatus::Paid => {
                    summary.paid_cents += o.total_cents;
                    summary.paid_orders += 1;
                }
                PaymentStatus::Refunded => {}
                _ if o.status != OrderStatus::Cancelled => {
                    summary.outstanding_cents += o.total_cents;
                    summary.unpaid_orders += 1;
                }
                _ => {}
            }
        }
        summary.paid_display = format_usd(summary.paid_cents);
        summary.outstanding_display = format_usd(summary.outstanding_cents);
        summary
    }
}

/// GET /api/v1/billing/payments
pub async fn list_payments(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<Vec<Payment>>>> {
    let payments = PaymentRepo::list_for_agent(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse { data: payments }))
}

/// GET /api/v1/billing/summary
pub async fn summary(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<BillingSummary>>> {
    let orders = OrderRepo::list_for_agent(&state.pool, auth.user_id).await?;
    let views = state.overrides.apply_all(orders);
    Ok(Json(DataResponse {
        data: BillingSummary::compute(&views),
    }))
}

/// POST /api/v1/billing/payment-intents
///
/// Charges the order total through the payment gateway.
///
/// The attempt row is inserted and the order's payment override set to
/// `processing` before the gateway is called, so a failed write afterwards
/// can never let a second request charge the card again. A decline records
/// a failed attempt, marks the order `failed`, and returns 402 with the
/// provider's message.
pub async fn create_payment_intent(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<CreatePaymentIntentRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<PaymentOutcome>>)> {
    require_non_blank("payment_method_ref", &input.payment_method_ref)?;

    let view = load_view(&state, input.order_id, Some(auth.user_id)).await?;
    let order = &view.order;
    if order.status == OrderStatus::Cancelled {
        return Err(CoreError::Validation("Cancelled orders cannot be paid".into()).into());
    }
    if matches!(
        order.payment_status,
        PaymentStatus::Paid | PaymentStatus::Processing
    ) {
        return Err(CoreError::Conflict(format!(
            "Order payment is already {}",
            order.payment_status
        ))
        .into());
    }
    if PaymentRepo::has_succeeded(&state.pool, order.id).await? {
        return Err(CoreError::Conflict("Order has already been paid".into()).into());
    }

    let previous_status = order.payment_status;
    let request = PaymentRequest {
        amount_cents: order.total_cents,
        currency: state.config.payment.currency.clone(),
        payment_method_ref: input.payment_method_ref.clone(),
        order_id: order.id,
        agent_id: auth.user_id,
    };

    let attempt = PaymentRepo::create(
        &state.pool,
        &CreatePayment {
            order_id: request.order_id,
            agent_id: request.agent_id,
            amount_cents: request.amount_cents,
            payment_method_ref: request.payment_method_ref.clone(),
            intent_id: None,
            status: PaymentAttemptStatus::Processing,
            error_message: None,
        },
    )
    .await?;
    state
        .overrides
        .payment
        .set(request.order_id, PaymentStatus::Processing);

    match state.payments.create_payment_intent(&request).await {
        Ok(intent) => {
            let order_status = intent.status.order_payment_status();
            state.overrides.payment.set(request.order_id, order_status);

            let payment = PaymentRepo::finish(
                &state.pool,
                attempt.id,
                intent.status,
                Some(&intent.id),
                None,
            )
            .await
            .map_err(|e| {
                tracing::error!(
                    order_id = request.order_id,
                    payment_id = attempt.id,
                    intent_id = %intent.id,
                    error = %e,
                    "Charged but failed to record the payment intent"
                );
                e
            })?
            .unwrap_or(attempt);

            let updated = OrderRepo::update_payment_status(&state.pool, request.order_id, order_status)
                .await?
                .ok_or_else(|| crate::handlers::orders::not_found(request.order_id))?;

            tracing::info!(
                order_id = request.order_id,
                payment_id = payment.id,
                intent_id = %intent.id,
                status = %payment.status,
                "Payment recorded"
            );
            Ok((
                StatusCode::CREATED,
                Json(DataResponse {
                    data: PaymentOutcome {
                        payment,
                        order: state.overrides.apply(updated),
                    },
                }),
            ))
        }
        Err(PaymentError::Declined(message)) => {
            state
                .overrides
                .payment
                .set(request.order_id, PaymentStatus::Failed);
            PaymentRepo::finish(
                &state.pool,
                attempt.id,
                PaymentAttemptStatus::Failed,
                None,
                Some(&message),
            )
            .await?;
            OrderRepo::update_payment_status(&state.pool, request.order_id, PaymentStatus::Failed)
                .await?;

            tracing::info!(order_id = request.order_id, "Payment declined");
            Err(AppError::Payment(PaymentError::Declined(message)))
        }
        Err(e) => {
            // No intent was created; the agent may try again.
            state.overrides.payment.set(request.order_id, previous_status);
            let reason = e.to_string();
            if let Err(db_err) = PaymentRepo::finish(
                &state.pool,
                attempt.id,
                PaymentAttemptStatus::Failed,
                None,
                Some(&reason),
            )
            .await
            {
                tracing::warn!(payment_id = attempt.id, error = %db_err, "Failed to close payment attempt");
            }
            Err(e.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use shootdesk_core::overrides::MergePolicy;
    use shootdesk_db::models::order::Order;

    use super::*;
    use crate::overrides::OrderOverrides;

    fn view(status: OrderStatus, payment_status: PaymentStatus, total_cents: Cents) -> OrderView {
        let now = Utc::now();
        OrderOverrides::in_memory(MergePolicy::OverrideWins).apply(Order {
            id: 1,
            property_id: 1,
            agent_id: 1,
            service_names: vec![],
            status,
            payment_status,
            shoot_date: None,
            agent_name: "Dana".into(),
            notes: None,
            total_cents,
            created_at: now,
            updated_at: now,
        })
    }

    #[test]
    fn summary_splits_paid_and_outstanding() {
        let orders = vec![
            view(OrderStatus::Delivered, PaymentStatus::Paid, 34_800),
            view(OrderStatus::Scheduled, PaymentStatus::Unpaid, 19_900),
            view(OrderStatus::Pending, PaymentStatus::Failed, 9_900),
            view(OrderStatus::Cancelled, PaymentStatus::Unpaid, 14_900),
            view(OrderStatus::Completed, PaymentStatus::Refunded, 24_900),
        ];

        let summary = BillingSummary::compute(&orders);

        assert_eq!(summary.paid_cents, 34_800);
        assert_eq!(summary.paid_orders, 1);
        assert_eq!(summary.outstanding_cents, 29_800);
        assert_eq!(summary.unpaid_orders, 2);
        assert_eq!(summary.outstanding_display, "$298.00");
    }
}
