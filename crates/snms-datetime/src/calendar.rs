//! Day and month boundaries, minute rounding, day iteration and interval
//! overlap.

use std::collections::HashSet;

use chrono::{
    DateTime, Datelike, Days as DayCount, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta,
    TimeZone, Timelike, Weekday,
};
use chrono_tz::Tz;
use rrule::{Frequency, NWeekday, RRule, RRuleSet};

use crate::convert::localize;
use crate::error::{DateTimeError, DateTimeResult};
use crate::moment::Moment;

/// Last minute of a day. Day ends are minute-granular.
const DAY_END: NaiveTime = match NaiveTime::from_hms_opt(23, 59, 0) {
    Some(time) => time,
    None => NaiveTime::MIN,
};

const WORKING_DAYS: [Weekday; 5] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
];

fn day_boundary(day: Moment, timezone: Option<Tz>, time: NaiveTime) -> DateTimeResult<Moment> {
    let (date, zone) = match day {
        Moment::Aware(dt) if timezone.is_some() => {
            return Err(DateTimeError::ConflictingTimezone(dt.to_rfc3339()));
        }
        Moment::Aware(dt) => (dt.date_naive(), Some(dt.timezone())),
        other => (other.date(), timezone),
    };

    let boundary = date.and_time(time);
    match zone {
        Some(tz) => Ok(Moment::Aware(localize(boundary, tz)?)),
        None => Ok(Moment::Naive(boundary)),
    }
}

/// ## Summary
/// Returns midnight of the given day.
///
/// An aware datetime keeps its own timezone; a date or naive datetime gets
/// `timezone` attached if one is given.
///
/// ## Errors
/// Returns `DateTimeError::ConflictingTimezone` if `day` is aware and
/// `timezone` is also given, or `NonExistentTime` if midnight is skipped by a
/// DST transition.
pub fn get_day_start(day: impl Into<Moment>, timezone: Option<Tz>) -> DateTimeResult<Moment> {
    day_boundary(day.into(), timezone, NaiveTime::MIN)
}

/// ## Summary
/// Returns 23:59 of the given day, with the same timezone rules as
/// [`get_day_start`].
///
/// ## Errors
/// Returns `DateTimeError::ConflictingTimezone` if `day` is aware and
/// `timezone` is also given.
pub fn get_day_end(day: impl Into<Moment>, timezone: Option<Tz>) -> DateTimeResult<Moment> {
    day_boundary(day.into(), timezone, DAY_END)
}

#[must_use]
pub fn get_month_start(date: NaiveDate) -> NaiveDate {
    date - DayCount::new(u64::from(date.day0()))
}

#[must_use]
pub fn get_month_end(date: NaiveDate) -> NaiveDate {
    get_month_start(date) + Months::new(1) - DayCount::new(1)
}

/// Floor division, rounding towards negative infinity for either sign.
const fn floor_div(lhs: i128, rhs: i128) -> i128 {
    let quotient = lhs / rhs;
    if lhs % rhs != 0 && ((lhs < 0) != (rhs < 0)) {
        quotient - 1
    } else {
        quotient
    }
}

/// Date-times that can be moved by a `TimeDelta` without panicking.
pub trait Shift: Timelike + Sized {
    fn shift(self, delta: TimeDelta) -> Option<Self>;
}

impl Shift for NaiveDateTime {
    fn shift(self, delta: TimeDelta) -> Option<Self> {
        self.checked_add_signed(delta)
    }
}

impl<Z: TimeZone> Shift for DateTime<Z> {
    fn shift(self, delta: TimeDelta) -> Option<Self> {
        self.checked_add_signed(delta)
    }
}

/// ## Summary
/// Rounds `dt` up to the next multiple of `precision` minutes within the hour.
///
/// A value already on a boundary moves a full step. A negative precision
/// rounds down instead. Sub-second fields count towards the rounding, and
/// the result always has zero seconds. A precision of zero returns `dt`
/// unchanged.
///
/// ## Errors
/// Returns `DateTimeError::OutOfRange` if the step does not fit a
/// `TimeDelta` or moves the value past the supported calendar range.
pub fn round_up_to_minutes<T: Shift>(dt: T, precision: i64) -> DateTimeResult<T> {
    if precision == 0 {
        return Ok(dt);
    }
    let increment = i128::from(precision) * 60 * 1_000_000_000;
    let into_hour = i128::from(dt.minute()) * 60 * 1_000_000_000
        + i128::from(dt.second()) * 1_000_000_000
        + i128::from(dt.nanosecond());
    let delta = floor_div(into_hour, increment) * increment + increment - into_hour;

    let out_of_range = || DateTimeError::OutOfRange(format!("rounding to {precision} minutes"));
    let seconds = i64::try_from(delta.div_euclid(1_000_000_000)).map_err(|_err| out_of_range())?;
    let nanos = u32::try_from(delta.rem_euclid(1_000_000_000)).map_err(|_err| out_of_range())?;
    let delta = TimeDelta::new(seconds, nanos).ok_or_else(out_of_range)?;
    dt.shift(delta).ok_or_else(out_of_range)
}

/// ## Summary
/// True on Saturdays and Sundays.
#[must_use]
pub fn is_weekend<D: Datelike>(d: &D) -> bool {
    matches!(d.weekday(), Weekday::Sat | Weekday::Sun)
}

/// ## Summary
/// Whether two ranges overlap. With `inclusive` set, ranges that only touch
/// at an endpoint count as overlapping.
#[must_use]
pub fn overlaps<T: PartialOrd>(range1: &(T, T), range2: &(T, T), inclusive: bool) -> bool {
    let (start1, end1) = range1;
    let (start2, end2) = range2;
    if inclusive {
        start1 <= end2 && start2 <= end1
    } else {
        start1 < end2 && start2 < end1
    }
}

/// ## Summary
/// Returns the intersection of two ranges, or `None` if they do not
/// (strictly) overlap.
#[must_use]
pub fn get_overlap<T: PartialOrd + Clone>(range1: &(T, T), range2: &(T, T)) -> Option<(T, T)> {
    if !overlaps(range1, range2, false) {
        return None;
    }
    let (start1, end1) = range1;
    let (start2, end2) = range2;
    let latest_start = if start1 >= start2 { start1 } else { start2 };
    let earliest_end = if end1 <= end2 { end1 } else { end2 };
    Some((latest_start.clone(), earliest_end.clone()))
}

/// A finite sequence of calendar days, see [`iterdays`].
///
/// Iterating does not consume it; each call to [`Days::iter`] starts over.
#[derive(Debug, Clone)]
pub struct Days {
    rrule_set: Option<RRuleSet>,
    whitelist: Option<HashSet<NaiveDate>>,
    blacklist: Option<HashSet<NaiveDate>>,
}

impl Days {
    pub fn iter(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.rrule_set
            .iter()
            .flat_map(IntoIterator::into_iter)
            .map(|occurrence| occurrence.date_naive())
            .filter(|day| self.whitelist.as_ref().is_none_or(|days| days.contains(day)))
            .filter(|day| self.blacklist.as_ref().is_none_or(|days| !days.contains(day)))
    }
}

/// ## Summary
/// Lists every day from `start` to `end` inclusive.
///
/// Weekends are skipped when `skip_weekends` is set. A day must be in
/// `whitelist` (if given) and not in `blacklist` (if given); empty sets do not
/// filter. Aware bounds use their local date.
///
/// ## Errors
/// Returns `DateTimeError::Recurrence` if the daily rule cannot be built for
/// the bounds.
pub fn iterdays(
    start: impl Into<Moment>,
    end: impl Into<Moment>,
    skip_weekends: bool,
    whitelist: Option<&HashSet<NaiveDate>>,
    blacklist: Option<&HashSet<NaiveDate>>,
) -> DateTimeResult<Days> {
    let start = start.into().date();
    let end = end.into().date();
    let non_empty = |days: Option<&HashSet<NaiveDate>>| days.filter(|days| !days.is_empty()).cloned();

    let rrule_set = if end < start {
        tracing::trace!(%start, %end, "Empty day range");
        None
    } else {
        let dt_start = start.and_time(NaiveTime::MIN).and_utc().with_timezone(&rrule::Tz::UTC);
        let until = end.and_time(DAY_END).and_utc().with_timezone(&rrule::Tz::UTC);

        let mut rule = RRule::new(Frequency::Daily).until(until);
        if skip_weekends {
            rule = rule.by_weekday(WORKING_DAYS.into_iter().map(NWeekday::Every).collect());
        }
        Some(rule.build(dt_start)?)
    };

    Ok(Days {
        rrule_set,
        whitelist: non_empty(whitelist),
        blacklist: non_empty(blacklist),
    })
}
