//! Input values accepted by operations that take "a date or a datetime".

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

/// A calendar date, a naive wall-clock timestamp, or a timezone-aware instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Moment {
    Date(NaiveDate),
    Naive(NaiveDateTime),
    Aware(DateTime<Tz>),
}

impl Moment {
    /// ## Summary
    /// Returns the calendar date of this value, in its own timezone if it has one.
    #[must_use]
    pub fn date(&self) -> NaiveDate {
        match self {
            Self::Date(date) => *date,
            Self::Naive(naive) => naive.date(),
            Self::Aware(dt) => dt.date_naive(),
        }
    }

    /// ## Summary
    /// Returns the wall-clock time of this value. A bare date is its midnight.
    #[must_use]
    pub fn naive_local(&self) -> NaiveDateTime {
        match self {
            Self::Date(date) => date.and_time(NaiveTime::MIN),
            Self::Naive(naive) => *naive,
            Self::Aware(dt) => dt.naive_local(),
        }
    }

    /// ## Summary
    /// Returns the attached timezone, if any.
    #[must_use]
    pub fn timezone(&self) -> Option<Tz> {
        match self {
            Self::Aware(dt) => Some(dt.timezone()),
            Self::Date(_) | Self::Naive(_) => None,
        }
    }

    #[must_use]
    pub fn is_aware(&self) -> bool {
        matches!(self, Self::Aware(_))
    }
}

impl From<NaiveDate> for Moment {
    fn from(date: NaiveDate) -> Self {
        Self::Date(date)
    }
}

impl From<NaiveDateTime> for Moment {
    fn from(naive: NaiveDateTime) -> Self {
        Self::Naive(naive)
    }
}

impl From<DateTime<Tz>> for Moment {
    fn from(dt: DateTime<Tz>) -> Self {
        Self::Aware(dt)
    }
}

impl From<DateTime<Utc>> for Moment {
    fn from(dt: DateTime<Utc>) -> Self {
        Self::Aware(Tz::UTC.from_utc_datetime(&dt.naive_utc()))
    }
}
