//! Order override caches and the merged order view.
//!
//! Admin status, payment, and asset changes are written to these caches
//! before the database row, and every order read overlays them, so the
//! agent-facing views reflect an admin change immediately.

use std::path::Path;

use serde::{Deserialize, Serialize};
use shootdesk_core::error::CoreError;
use shootdesk_core::overrides::{MergePolicy, OverrideCache};
use shootdesk_core::pricing::format_usd;
use shootdesk_core::stats::OrderSnapshot;
use shootdesk_core::status::{OrderStatus, PaymentStatus};
use shootdesk_core::types::DbId;
use shootdesk_db::models::deliverable::Deliverable;
use shootdesk_db::models::order::Order;

const STATUS_FILE: &str = "order_status_overrides.json";
const PAYMENT_FILE: &str = "order_payment_overrides.json";
const ASSETS_FILE: &str = "order_asset_overrides.json";

/// Which cache an admin override endpoint addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverrideKind {
    Status,
    Payment,
    Assets,
}

/// The three per-order caches plus the configured merge policy.
pub struct OrderOverrides {
    pub status: OverrideCache<OrderStatus>,
    pub payment: OverrideCache<PaymentStatus>,
    pub assets: OverrideCache<Vec<Deliverable>>,
    policy: MergePolicy,
}

impl OrderOverrides {
    pub fn in_memory(policy: MergePolicy) -> Self {
        Self {
            status: OverrideCache::in_memory(),
            payment: OverrideCache::in_memory(),
            assets: OverrideCache::in_memory(),
            policy,
        }
    }

    /// Open (or create) the file-backed caches under `dir`.
    pub fn open(dir: &Path, policy: MergePolicy) -> Result<Self, CoreError> {
        Ok(Self {
            status: OverrideCache::open(dir.join(STATUS_FILE))?,
            payment: OverrideCache::open(dir.join(PAYMENT_FILE))?,
            assets: OverrideCache::open(dir.join(ASSETS_FILE))?,
            policy,
        })
    }

    pub fn policy(&self) -> MergePolicy {
        self.policy
    }

    /// Overlay the status and payment overrides onto an order row.
    pub fn apply(&self, mut order: Order) -> OrderView {
        let stored_status = order.status;
        let stored_payment = order.payment_status;

        order.status = self
            .status
            .merge(order.id, order.status, order.updated_at, self.policy);
        order.payment_status =
            self.payment
                .merge(order.id, order.payment_status, order.updated_at, self.policy);

        let status_overridden = order.status != stored_status;
        let payment_overridden = order.payment_status != stored_payment;
        OrderView::new(order, status_overridden, payment_overridden)
    }

    pub fn apply_all(&self, orders: Vec<Order>) -> Vec<OrderView> {
        orders.into_iter().map(|o| self.apply(o)).collect()
    }

    /// Overlay the asset override onto the deliverable rows of `order`.
    pub fn deliverables(&self, order: &Order, rows: Vec<Deliverable>) -> Vec<Deliverable> {
        self.assets
            .merge(order.id, rows, order.updated_at, self.policy)
    }

    /// Current override for `id` in the given cache, as JSON.
    pub fn inspect(&self, kind: OverrideKind, id: DbId) -> Option<OverrideSnapshot> {
        let to_snapshot = |value: serde_json::Result<serde_json::Value>, set_at| {
            value.ok().map(|value| OverrideSnapshot {
                kind,
                id,
                value,
                set_at,
            })
        };
        match kind {
            OverrideKind::Status => self
                .status
                .get_entry(id)
                .and_then(|e| to_snapshot(serde_json::to_value(e.value), e.set_at)),
            OverrideKind::Payment => self
                .payment
                .get_entry(id)
                .and_then(|e| to_snapshot(serde_json::to_value(e.value), e.set_at)),
            OverrideKind::Assets => self
                .assets
                .get_entry(id)
                .and_then(|e| to_snapshot(serde_json::to_value(e.value), e.set_at)),
        }
    }

    /// Wait for pending writes of all three caches to reach disk.
    pub async fn flush(&self) {
        tokio::join!(self.status.flush(), self.payment.flush(), self.assets.flush());
    }

    /// Remove the override for `id` from the given cache.
    pub fn clear(&self, kind: OverrideKind, id: DbId) -> bool {
        match kind {
            OverrideKind::Status => self.status.clear(id),
            OverrideKind::Payment => self.payment.clear(id),
            OverrideKind::Assets => self.assets.clear(id),
        }
    }
}

/// An override as exposed by the admin inspection endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct OverrideSnapshot {
    pub kind: OverrideKind,
    pub id: DbId,
    pub value: serde_json::Value,
    pub set_at: shootdesk_core::types::Timestamp,
}

/// An order after the override merge, with display fields the portal renders.
#[derive(Debug, Clone, Serialize)]
pub struct OrderView {
    #[serde(flatten)]
    pub order: Order,
    pub status_label: &'static str,
    pub badge: &'static str,
    pub payment_status_label: &'static str,
    pub total_display: String,
    /// The stored status differs from the one shown.
    pub status_overridden: bool,
    /// The stored payment status differs from the one shown.
    pub payment_overridden: bool,
}

impl OrderView {
    fn new(order: Order, status_overridden: bool, payment_overridden: bool) -> Self {
        Self {
            status_label: order.status.label(),
            badge: order.status.badge(),
            payment_status_label: order.payment_status.label(),
            total_display: format_usd(order.total_cents),
            status_overridden,
            payment_overridden,
            order,
        }
    }

    pub fn snapshot(&self) -> OrderSnapshot {
        OrderSnapshot {
            agent_id: self.order.agent_id,
            status: self.order.status,
            payment_status: self.order.payment_status,
            total_cents: self.order.total_cents,
            shoot_date: self.order.shoot_date,
        }
    }
}
