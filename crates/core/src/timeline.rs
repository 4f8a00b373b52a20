//! Order progress timeline and admin status transitions.
//!
//! The customer-facing order page renders a five-step progress bar. Each
//! [`OrderStatus`] maps onto one of those steps; `Cancelled` maps onto none.

use serde::Serialize;

use crate::error::CoreError;
use crate::status::OrderStatus;

/// Steps shown on the order progress bar, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TimelineStep {
    Ordered,
    Scheduled,
    Shoot,
    Editing,
    Delivered,
}

impl TimelineStep {
    pub const ALL: [TimelineStep; 5] = [
        Self::Ordered,
        Self::Scheduled,
        Self::Shoot,
        Self::Editing,
        Self::Delivered,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Ordered => "Order Placed",
            Self::Scheduled => "Shoot Scheduled",
            Self::Shoot => "Shoot Day",
            Self::Editing => "Editing",
            Self::Delivered => "Delivered",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepState {
    Complete,
    Current,
    Upcoming,
}

#[derive(Debug, Clone, Serialize)]
pub struct TimelineEntry {
    pub step: TimelineStep,
    pub label: &'static str,
    pub state: StepState,
}

/// Rendered progress bar for one order.
#[derive(Debug, Clone, Serialize)]
pub struct Timeline {
    pub status: OrderStatus,
    pub status_label: &'static str,
    pub badge: &'static str,
    /// Index into `steps` of the current step, `None` when cancelled.
    pub current_step: Option<usize>,
    pub cancelled: bool,
    pub steps: Vec<TimelineEntry>,
}

/// Map a status onto its progress-bar step index.
pub fn step_index(status: OrderStatus) -> Option<usize> {
    match status {
        OrderStatus::Pending => Some(0),
        OrderStatus::Scheduled => Some(1),
        OrderStatus::Shooting => Some(2),
        OrderStatus::Editing => Some(3),
        OrderStatus::Delivered | OrderStatus::Completed => Some(4),
        OrderStatus::Cancelled => None,
    }
}

/// Build the progress bar for `status`.
///
/// `Completed` marks every step complete; `Delivered` leaves the final step
/// current until the agent (or an admin) closes the order out.
pub fn timeline(status: OrderStatus) -> Timeline {
    let current = step_index(status);
    let all_done = status == OrderStatus::Completed;

    let steps = TimelineStep::ALL
        .iter()
        .enumerate()
        .map(|(i, step)| {
            let state = match current {
                _ if all_done => StepState::Complete,
                Some(c) if i < c => StepState::Complete,
                Some(c) if i == c => StepState::Current,
                _ => StepState::Upcoming,
            };
            TimelineEntry {
                step: *step,
                label: step.label(),
                state,
            }
        })
        .collect();

    Timeline {
        status,
        status_label: status.label(),
        badge: status.badge(),
        current_step: current,
        cancelled: status == OrderStatus::Cancelled,
        steps,
    }
}

/// Ordering rank used for forward-only transitions.
fn rank(status: OrderStatus) -> u8 {
    match status {
        OrderStatus::Pending => 0,
        OrderStatus::Scheduled => 1,
        OrderStatus::Shooting => 2,
        OrderStatus::Editing => 3,
        OrderStatus::Delivered => 4,
        OrderStatus::Completed => 5,
        OrderStatus::Cancelled => u8::MAX,
    }
}

/// Check whether an admin may move an order from `from` to `to`.
///
/// Setting the current status again is accepted as a no-op. Terminal
/// states never move. Any other state may move forward or be cancelled;
/// the only backwards move is `delivered -> editing` (re-edit request).
pub fn can_transition(from: OrderStatus, to: OrderStatus) -> bool {
    if from == to {
        return true;
    }
    if from.is_terminal() {
        return false;
    }
    if to == OrderStatus::Cancelled {
        return true;
    }
    if from == OrderStatus::Delivered && to == OrderStatus::Editing {
        return true;
    }
    rank(to) > rank(from)
}

/// Validate a transition, returning a validation error for invalid ones.
pub fn validate_transition(from: OrderStatus, to: OrderStatus) -> Result<(), CoreError> {
    if can_transition(from, to) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid status transition: {from} -> {to}"
        )))
    }
}
