//! Human-friendly rendering of durations and nearby dates.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, TimeDelta};
use icu::locale::Locale;

use crate::context::FormatContext;
use crate::convert::now_utc;
use crate::error::{DateTimeError, DateTimeResult};
use crate::format::{Format, format_date};
use crate::units::{TimeUnit, UnitPhrases, UnitStyle};

/// Fields a human timedelta is split into, coarsest first.
const FIELDS: [TimeUnit; 4] = [
    TimeUnit::Day,
    TimeUnit::Hour,
    TimeUnit::Minute,
    TimeUnit::Second,
];

/// Finest unit that [`format_human_timedelta`] shows when coarser fields are
/// non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Granularity {
    #[default]
    Seconds,
    Minutes,
    Hours,
    Days,
}

impl Granularity {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Seconds => "seconds",
            Self::Minutes => "minutes",
            Self::Hours => "hours",
            Self::Days => "days",
        }
    }

    #[must_use]
    pub const fn unit(self) -> TimeUnit {
        match self {
            Self::Seconds => TimeUnit::Second,
            Self::Minutes => TimeUnit::Minute,
            Self::Hours => TimeUnit::Hour,
            Self::Days => TimeUnit::Day,
        }
    }

    /// Position of the unit in [`FIELDS`].
    const fn field_index(self) -> usize {
        match self {
            Self::Days => 0,
            Self::Hours => 1,
            Self::Minutes => 2,
            Self::Seconds => 3,
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Granularity {
    type Err = DateTimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "seconds" => Ok(Self::Seconds),
            "minutes" => Ok(Self::Minutes),
            "hours" => Ok(Self::Hours),
            "days" => Ok(Self::Days),
            other => Err(DateTimeError::InvalidFormat(format!(
                "unknown granularity {other}"
            ))),
        }
    }
}

/// Whole seconds of `delta`, rounded towards negative infinity.
fn floor_seconds(delta: TimeDelta) -> i64 {
    let seconds = delta.num_seconds();
    if delta.subsec_nanos() < 0 {
        seconds - 1
    } else {
        seconds
    }
}

/// Days, hours, minutes and seconds by successive floor division, so only the
/// day field of a negative duration is negative.
fn split_fields(total_seconds: i64) -> [i64; 4] {
    let days = total_seconds.div_euclid(86_400);
    let rest = total_seconds.rem_euclid(86_400);
    [days, rest / 3_600, rest % 3_600 / 60, rest % 60]
}

/// Zeroes the fields finer than `granularity`, unless every coarser field is
/// zero, in which case finer fields are pulled in one at a time until one of
/// them is non-zero.
fn visible_fields(mut values: [i64; 4], granularity: Granularity) -> [i64; 4] {
    let cutoff = granularity.field_index();
    let mut used = [false; 4];
    for (index, value) in values.iter().enumerate().take(cutoff + 1) {
        used[index] = *value != 0;
    }

    let used_sum = |used: &[bool; 4]| -> i64 {
        values
            .iter()
            .zip(used)
            .filter(|(_, used)| **used)
            .map(|(value, _)| *value)
            .sum()
    };

    let mut next = cutoff + 1;
    while next < FIELDS.len() && used_sum(&used) == 0 {
        used[next] = true;
        next += 1;
    }

    for value in &mut values[next..] {
        *value = 0;
    }
    values
}

/// ## Summary
/// Formats a duration such as `3 minutes` or `1d 4h`.
///
/// A single non-zero field uses its long name; several fields use short
/// names joined by spaces; an empty result is the zero phrase of the
/// granularity unit. `narrow` uses the short names throughout.
///
/// ## Errors
/// Returns `DateTimeError::Icu` if unit data is unavailable.
pub fn format_human_timedelta(
    delta: TimeDelta,
    granularity: Granularity,
    narrow: bool,
    locale: Option<&Locale>,
    ctx: &FormatContext<'_>,
) -> DateTimeResult<String> {
    let phrases = UnitPhrases::new(ctx.resolve_locale(locale));
    let long_style = if narrow {
        UnitStyle::Narrow
    } else {
        UnitStyle::Long
    };

    let values = visible_fields(split_fields(floor_seconds(delta)), granularity);
    let nonzero: Vec<(TimeUnit, i64)> = FIELDS
        .into_iter()
        .zip(values)
        .filter(|(_, value)| *value != 0)
        .collect();

    match nonzero.as_slice() {
        [] => phrases.phrase(granularity.unit(), long_style, 0),
        [(unit, value)] => phrases.phrase(*unit, long_style, *value),
        parts => Ok(parts
            .iter()
            .map(|(unit, value)| phrases.phrase(*unit, UnitStyle::Narrow, *value))
            .collect::<DateTimeResult<Vec<_>>>()?
            .join(" ")),
    }
}

/// ## Summary
/// Splits a duration into hours, minutes and seconds. Hours are not capped
/// at 24.
#[must_use]
pub fn timedelta_split(delta: TimeDelta) -> (i64, i64, i64) {
    let seconds = floor_seconds(delta);
    let hours = seconds.div_euclid(3_600);
    let rest = seconds.rem_euclid(3_600);
    (hours, rest / 60, rest % 60)
}

/// ## Summary
/// Returns `yesterday`, `today` or `tomorrow` for those days (by UTC date),
/// otherwise the date formatted with `format`.
///
/// ## Errors
/// Returns an error if the fallback formatting fails.
pub fn format_human_date(
    d: NaiveDate,
    format: &Format,
    locale: Option<&Locale>,
    ctx: &FormatContext<'_>,
) -> DateTimeResult<String> {
    format_human_date_at(d, now_utc(true).date_naive(), format, locale, ctx)
}

pub(crate) fn format_human_date_at(
    d: NaiveDate,
    today: NaiveDate,
    format: &Format,
    locale: Option<&Locale>,
    ctx: &FormatContext<'_>,
) -> DateTimeResult<String> {
    let relative = match (d - today).num_days() {
        -1 => Some("yesterday"),
        0 => Some("today"),
        1 => Some("tomorrow"),
        _ => None,
    };
    match relative {
        Some(word) => Ok(word.to_string()),
        None => format_date(d, format, locale, None, ctx),
    }
}
