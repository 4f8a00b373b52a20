//! Dashboard stat aggregation.
//!
//! Stats are computed from [`OrderSnapshot`]s built *after* the override
//! merge, so the numbers match what the order lists show.

use std::collections::HashSet;

use serde::Serialize;

use crate::calendar::week_bounds;
use crate::status::{OrderStatus, PaymentStatus};
use crate::types::{Cents, DbId, Timestamp};

/// The fields of an order that dashboard stats depend on.
#[derive(Debug, Clone, Copy)]
pub struct OrderSnapshot {
    pub agent_id: DbId,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub total_cents: Cents,
    pub shoot_date: Option<Timestamp>,
}

/// Agent dashboard tiles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AgentStats {
    pub total_orders: i64,
    pub active_orders: i64,
    pub delivered_orders: i64,
    pub upcoming_shoots: i64,
    pub active_listings: i64,
    pub total_spent_cents: Cents,
}

impl AgentStats {
    pub fn compute(orders: &[OrderSnapshot], active_listings: i64, now: Timestamp) -> Self {
        let mut stats = AgentStats {
            active_listings,
            ..Default::default()
        };

        for o in orders {
            stats.total_orders += 1;
            if o.status.is_active() {
                stats.active_orders += 1;
            }
            if matches!(o.status, OrderStatus::Delivered | OrderStatus::Completed) {
                stats.delivered_orders += 1;
            }
            if o.status == OrderStatus::Scheduled && o.shoot_date.is_some_and(|d| d >= now) {
                stats.upcoming_shoots += 1;
            }
            if o.payment_status == PaymentStatus::Paid {
                stats.total_spent_cents += o.total_cents;
            }
        }

        stats
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusCount {
    pub status: OrderStatus,
    pub count: i64,
}

/// Admin dashboard tiles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminStats {
    pub total_orders: i64,
    pub revenue_cents: Cents,
    pub outstanding_cents: Cents,
    pub bookings_this_week: i64,
    pub distinct_agents: i64,
    /// One entry per [`OrderStatus`], in lifecycle order (zero counts included).
    pub by_status: Vec<StatusCount>,
}

impl AdminStats {
    pub fn compute(orders: &[OrderSnapshot], now: Timestamp) -> Self {
        let (week_start, week_end) = week_bounds(now);
        let mut agents = HashSet::new();
        let mut revenue = 0;
        let mut outstanding = 0;
        let mut bookings_this_week = 0;

        for o in orders {
            agents.insert(o.agent_id);
            match o.payment_status {
                PaymentStatus::Paid => revenue += o.total_cents,
                PaymentStatus::Refunded => {}
                _ if o.status != OrderStatus::Cancelled => outstanding += o.total_cents,
                _ => {}
            }
            if o.status != OrderStatus::Cancelled
                && o.shoot_date.is_some_and(|d| d >= week_start && d < week_end)
            {
                bookings_this_week += 1;
            }
        }

        let by_status = OrderStatus::ALL
            .iter()
            .map(|s| StatusCount {
                status: *s,
                count: orders.iter().filter(|o| o.status == *s).count() as i64,
            })
            .collect();

        AdminStats {
            total_orders: orders.len() as i64,
            revenue_cents: revenue,
            outstanding_cents: outstanding,
            bookings_this_week,
            distinct_agents: agents.len() as i64,
            by_status,
        }
    }
}
