pub mod controller;
pub mod timing;

use std::time::Duration;

use chrono::{DateTime, Local, NaiveDate, NaiveTime, TimeZone, Timelike};
use serde::Serialize;

/// Hour and minute values the time picker must reject for a given day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TimeConstraints {
    pub disabled_hours: Vec<u32>,
    pub disabled_minutes: Vec<u32>,
}

/// Resolve a picked day and time-of-day into an absolute local instant
/// strictly after `now`. Seconds are zeroed.
///
/// Returns `None` when either input is missing, the instant is not in the
/// future, or the wall-clock time does not exist (skipped by a DST
/// transition).
pub fn resolve_instant(
    date: Option<NaiveDate>,
    time: Option<NaiveTime>,
    now: &DateTime<Local>,
) -> Option<DateTime<Local>> {
    let day = date?;
    let time = time?;
    let naive = day.and_hms_opt(time.hour(), time.minute(), 0)?;
    let candidate = Local.from_local_datetime(&naive).earliest()?;
    (candidate > *now).then_some(candidate)
}

/// Duration from `now` until the picked instant, if that instant is strictly
/// in the future.
pub fn compute_delay(
    date: Option<NaiveDate>,
    time: Option<NaiveTime>,
    now: &DateTime<Local>,
) -> Option<Duration> {
    let at = resolve_instant(date, time, now)?;
    (at - *now).to_std().ok()
}

/// Days strictly before the day containing `now` cannot be picked.
pub fn is_date_disabled(day: NaiveDate, now: &DateTime<Local>) -> bool {
    day < now.date_naive()
}

/// Hours and minutes that would put the alarm in the past on `selected_day`.
///
/// Any day other than today has no restrictions. On today, hours before the
/// current one are disabled, and minutes before the current one are disabled
/// only while the current hour is selected; picking a later hour frees up
/// every minute.
pub fn disabled_time_ranges(
    selected_day: NaiveDate,
    selected_hour: Option<u32>,
    now: &DateTime<Local>,
) -> TimeConstraints {
    if selected_day != now.date_naive() {
        return TimeConstraints::default();
    }

    let disabled_hours: Vec<u32> = (0..now.hour()).collect();
    let disabled_minutes: Vec<u32> = if selected_hour == Some(now.hour()) {
        (0..now.minute()).collect()
    } else {
        Vec::new()
    };

    TimeConstraints {
        disabled_hours,
        disabled_minutes,
    }
}
