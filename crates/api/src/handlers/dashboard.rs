//! Agent dashboard: stat tiles and the shoot calendar.

use axum::extract::{Query, State};
use axum::Json;
use chrono::{NaiveDate, Utc};
use serde::Serialize;
use shootdesk_core::calendar::{group_by_day, month_bounds, month_grid, CalendarDay};
use shootdesk_core::stats::{AgentStats, OrderSnapshot};
use shootdesk_core::status::OrderStatus;
use shootdesk_db::repositories::{OrderRepo, PropertyRepo};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::overrides::OrderView;
use crate::query::MonthParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// A month of shoots laid out for a calendar view.
#[derive(Debug, Serialize)]
pub struct MonthCalendar {
    pub year: i32,
    pub month: u32,
    /// Sunday-first week rows; `null` cells fall outside the month.
    pub weeks: Vec<[Option<NaiveDate>; 7]>,
    pub days: Vec<CalendarDay<OrderView>>,
}

/// Build the month view from already-merged orders, skipping cancelled ones.
pub(crate) fn month_calendar(
    year: i32,
    month: u32,
    orders: Vec<OrderView>,
) -> AppResult<MonthCalendar> {
    let weeks = month_grid(year, month)?;
    let live = orders
        .into_iter()
        .filter(|v| v.order.status != OrderStatus::Cancelled)
        .collect();
    let groups = group_by_day(live, |v: &OrderView| v.order.shoot_date);
    Ok(MonthCalendar {
        year,
        month,
        weeks,
        days: groups.days,
    })
}

/// GET /api/v1/dashboard/stats
pub async fn agent_stats(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<AgentStats>>> {
    let orders = OrderRepo::list_for_agent(&state.pool, auth.user_id).await?;
    let snapshots: Vec<OrderSnapshot> = state
        .overrides
        .apply_all(orders)
        .iter()
        .map(OrderView::snapshot)
        .collect();
    let active_listings = PropertyRepo::count_active_for_agent(&state.pool, auth.user_id).await?;

    Ok(Json(DataResponse {
        data: AgentStats::compute(&snapshots, active_listings, Utc::now()),
    }))
}

/// GET /api/v1/dashboard/calendar?year=&month=
pub async fn calendar(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<MonthParams>,
) -> AppResult<Json<DataResponse<MonthCalendar>>> {
    let (year, month) = params.resolve();
    let (start, end) = month_bounds(year, month)?;

    let orders =
        OrderRepo::list_shoots_between(&state.pool, start, end, Some(auth.user_id)).await?;
    let view = month_calendar(year, month, state.overrides.apply_all(orders))?;
    Ok(Json(DataResponse { data: view }))
}
