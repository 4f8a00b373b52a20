//! Shoot calendar grouping.
//!
//! Both the agent calendar and the admin bookings page group orders by the
//! UTC calendar day of their shoot date and render a Sunday-first month grid.

use chrono::{Datelike, Duration, NaiveDate, TimeZone, Utc};
use serde::Serialize;

use crate::error::CoreError;
use crate::types::Timestamp;

/// All entries whose shoot falls on `date`, ordered by shoot time.
#[derive(Debug, Clone, Serialize)]
pub struct CalendarDay<T> {
    pub date: NaiveDate,
    pub entries: Vec<T>,
}

/// Entries grouped by day, plus those without a shoot date.
#[derive(Debug, Clone, Serialize)]
pub struct CalendarGroups<T> {
    pub days: Vec<CalendarDay<T>>,
    pub unscheduled: Vec<T>,
}

/// Group `items` by the UTC date returned from `shoot_at`.
///
/// Days are returned in ascending order; entries within a day are sorted by
/// shoot time (stable, so equal times keep their input order).
pub fn group_by_day<T, F>(items: Vec<T>, shoot_at: F) -> CalendarGroups<T>
where
    F: Fn(&T) -> Option<Timestamp>,
{
    let mut scheduled: Vec<(Timestamp, T)> = Vec::new();
    let mut unscheduled = Vec::new();

    for item in items {
        match shoot_at(&item) {
            Some(at) => scheduled.push((at, item)),
            None => unscheduled.push(item),
        }
    }

    scheduled.sort_by_key(|(at, _)| *at);

    let mut days: Vec<CalendarDay<T>> = Vec::new();
    for (at, item) in scheduled {
        let date = at.date_naive();
        match days.last_mut() {
            Some(day) if day.date == date => day.entries.push(item),
            _ => days.push(CalendarDay {
                date,
                entries: vec![item],
            }),
        }
    }

    CalendarGroups { days, unscheduled }
}

fn first_of_month(year: i32, month: u32) -> Result<NaiveDate, CoreError> {
    NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| CoreError::Validation(format!("Invalid month {year}-{month:02}")))
}

fn first_of_next_month(first: NaiveDate) -> Result<NaiveDate, CoreError> {
    let (y, m) = if first.month() == 12 {
        (first.year() + 1, 1)
    } else {
        (first.year(), first.month() + 1)
    };
    first_of_month(y, m)
}

/// UTC half-open range `[start, end)` covering the given month.
pub fn month_bounds(year: i32, month: u32) -> Result<(Timestamp, Timestamp), CoreError> {
    let first = first_of_month(year, month)?;
    let next = first_of_next_month(first)?;

    let start = Utc.from_utc_datetime(&first.and_time(chrono::NaiveTime::MIN));
    let end = Utc.from_utc_datetime(&next.and_time(chrono::NaiveTime::MIN));
    Ok((start, end))
}

/// Sunday-first week rows for a month view. Cells outside the month are `None`.
pub fn month_grid(year: i32, month: u32) -> Result<Vec<[Option<NaiveDate>; 7]>, CoreError> {
    let first = first_of_month(year, month)?;
    let next = first_of_next_month(first)?;

    let lead = first.weekday().num_days_from_sunday() as usize;
    let mut weeks = Vec::new();
    let mut week: [Option<NaiveDate>; 7] = [None; 7];
    let mut col = lead;
    let mut day = first;

    while day < next {
        week[col] = Some(day);
        col += 1;
        if col == 7 {
            weeks.push(week);
            week = [None; 7];
            col = 0;
        }
        day += Duration::days(1);
    }
    if col > 0 {
        weeks.push(week);
    }

    Ok(weeks)
}

/// Start of the Sunday-first week containing `at`, and the start of the next.
pub fn week_bounds(at: Timestamp) -> (Timestamp, Timestamp) {
    let date = at.date_naive();
    let offset = date.weekday().num_days_from_sunday() as i64;
    let sunday = date - Duration::days(offset);
    let start = Utc.from_utc_datetime(&sunday.and_time(chrono::NaiveTime::MIN));
    (start, start + Duration::days(7))
}
