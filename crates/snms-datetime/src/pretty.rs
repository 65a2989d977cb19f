//! Relative phrasing for dates near today: `Yesterday`, `Tomorrow at 10:00`,
//! `Last Friday`, and so on.

use chrono::{DateTime, NaiveDateTime, NaiveTime, Utc};
use chrono_tz::Tz;
use icu::locale::Locale;

use crate::context::FormatContext;
use crate::convert::{localize, now_utc};
use crate::error::DateTimeResult;
use crate::format::{Format, render_date, render_time, render_weekday};
use crate::moment::Moment;

/// Where a value falls relative to today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelativeDay {
    LastDay,
    SameDay,
    NextDay,
    LastWeek,
    NextWeek,
    Other,
}

impl RelativeDay {
    /// ## Summary
    /// Buckets a signed distance from today's midnight, in days.
    #[must_use]
    pub fn from_day_offset(diff: f64) -> Self {
        if diff < -6.0 {
            Self::Other
        } else if diff < -1.0 {
            Self::LastWeek
        } else if diff < 0.0 {
            Self::LastDay
        } else if diff < 1.0 {
            Self::SameDay
        } else if diff < 2.0 {
            Self::NextDay
        } else if diff < 7.0 {
            Self::NextWeek
        } else {
            Self::Other
        }
    }
}

/// ## Summary
/// Formats a date relative to today, e.g. `Today` or `Last Monday`, falling
/// back to the locale's medium date format. A bare date counts as midnight.
///
/// ## Errors
/// Returns an error if locale data is unavailable or a naive value does not
/// exist in `timezone`.
pub fn format_pretty_date(
    d: impl Into<Moment>,
    locale: Option<&Locale>,
    timezone: Option<Tz>,
    ctx: &FormatContext<'_>,
) -> DateTimeResult<String> {
    format_pretty_at(d.into(), locale, timezone, now_utc(false), false, ctx)
}

/// ## Summary
/// Like [`format_pretty_date`], followed by ` at <time>`.
///
/// ## Errors
/// Returns an error if locale data is unavailable or a naive value does not
/// exist in `timezone`.
pub fn format_pretty_datetime(
    dt: impl Into<Moment>,
    locale: Option<&Locale>,
    timezone: Option<Tz>,
    ctx: &FormatContext<'_>,
) -> DateTimeResult<String> {
    format_pretty_at(dt.into(), locale, timezone, now_utc(false), true, ctx)
}

pub(crate) fn format_pretty_at(
    moment: Moment,
    locale: Option<&Locale>,
    timezone: Option<Tz>,
    now: DateTime<Utc>,
    with_time: bool,
    ctx: &FormatContext<'_>,
) -> DateTimeResult<String> {
    let locale = ctx.resolve_locale(locale);
    let (wall_clock, diff) = day_offset(moment, timezone, now)?;
    let bucket = RelativeDay::from_day_offset(diff);
    tracing::trace!(diff, ?bucket, "Selected relative day");

    let date = wall_clock.date();
    let day = match bucket {
        RelativeDay::LastDay => "Yesterday".to_string(),
        RelativeDay::SameDay => "Today".to_string(),
        RelativeDay::NextDay => "Tomorrow".to_string(),
        RelativeDay::LastWeek => format!("Last {}", render_weekday(date, locale)?),
        RelativeDay::NextWeek => render_weekday(date, locale)?,
        RelativeDay::Other => render_date(date, &Format::Medium, locale)?,
    };

    if with_time {
        let time = render_time(wall_clock.time(), &Format::Short, locale)?;
        Ok(format!("{day} at {time}"))
    } else {
        Ok(day)
    }
}

/// Localizes `moment` into `timezone` and measures its distance in days from
/// midnight of the current day there.
#[expect(
    clippy::cast_precision_loss,
    reason = "millisecond differences between nearby dates fit in f64"
)]
fn day_offset(
    moment: Moment,
    timezone: Option<Tz>,
    now: DateTime<Utc>,
) -> DateTimeResult<(NaiveDateTime, f64)> {
    let (wall_clock, millis) = match (moment, timezone) {
        (Moment::Aware(dt), Some(tz)) => {
            let local = dt.with_timezone(&tz).naive_local();
            (local, millis_since_midnight(local, now.with_timezone(&tz).naive_local()))
        }
        (naive, Some(tz)) => {
            let local = localize(naive.naive_local(), tz)?.naive_local();
            (local, millis_since_midnight(local, now.with_timezone(&tz).naive_local()))
        }
        (Moment::Aware(dt), None) => {
            let midnight = now.date_naive().and_time(NaiveTime::MIN).and_utc();
            let millis = dt.with_timezone(&Utc).signed_duration_since(midnight).num_milliseconds();
            (dt.naive_local(), millis)
        }
        (naive, None) => {
            let local = naive.naive_local();
            (local, millis_since_midnight(local, now.naive_utc()))
        }
    };
    Ok((wall_clock, millis as f64 / 86_400_000.0))
}

fn millis_since_midnight(value: NaiveDateTime, now: NaiveDateTime) -> i64 {
    let midnight = now.date().and_time(NaiveTime::MIN);
    value.signed_duration_since(midnight).num_milliseconds()
}
