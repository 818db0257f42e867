//! Trailing time-window selection over a normalized series.
//!
//! Every function here is a pure function of its arguments; the reference
//! date is always passed in.

use time::{util, Date, Month};

use crate::{SeriesPoint, TimeHorizon};

/// First calendar day retained by `horizon` as of `now`.
///
/// Month arithmetic clamps to the last day of the target month, so
/// 2024-03-31 minus one month is 2024-02-29.
pub fn cutoff(horizon: TimeHorizon, now: Date) -> Date {
    months_before(now, horizon.months())
}

/// Points dated on or after the horizon cutoff, in their original order.
pub fn window(series: &[SeriesPoint], horizon: TimeHorizon, now: Date) -> Vec<SeriesPoint> {
    let start = cutoff(horizon, now);
    series
        .iter()
        .filter(|point| point.date >= start)
        .cloned()
        .collect()
}

/// Points within `start..=end`, in their original order.
///
/// An inverted range selects nothing.
pub fn between(series: &[SeriesPoint], start: Date, end: Date) -> Vec<SeriesPoint> {
    series
        .iter()
        .filter(|point| point.date >= start && point.date <= end)
        .cloned()
        .collect()
}

fn months_before(date: Date, months: u32) -> Date {
    let months = i32::try_from(months).unwrap_or(i32::MAX);
    let index = date.year() * 12 + i32::from(u8::from(date.month())) - 1 - months;
    let year = index.div_euclid(12);
    let month_number = (index.rem_euclid(12) + 1) as u8;

    let Ok(month) = Month::try_from(month_number) else {
        return Date::MIN;
    };
    let day = date.day().min(util::days_in_year_month(year, month));

    Date::from_calendar_date(year, month, day).unwrap_or(Date::MIN)
}
