//! Conversions between naive wall-clock timestamps, UTC and named timezones.

use chrono::{DateTime, LocalResult, NaiveDateTime, Offset, TimeZone, Timelike, Utc};
use chrono_tz::{OffsetComponents, Tz};

use crate::context::TimeConfig;
use crate::error::{DateTimeError, DateTimeResult};
use crate::moment::Moment;

/// ## Summary
/// Returns the current time in UTC.
///
/// With `exact` set to `false` the seconds and sub-second fields are zeroed.
#[must_use]
pub fn now_utc(exact: bool) -> DateTime<Utc> {
    let now = Utc::now();
    if exact { now } else { truncate_to_minute(now) }
}

pub(crate) fn truncate_to_minute<Z: TimeZone>(dt: DateTime<Z>) -> DateTime<Z> {
    dt.with_second(0)
        .and_then(|dt| dt.with_nanosecond(0))
        .unwrap_or(dt)
}

/// ## Summary
/// Returns the given value as a UTC instant.
///
/// A naive value is assumed to already hold UTC wall-clock time; a bare date
/// becomes its midnight. A value that is already UTC passes through.
///
/// ## Errors
/// Returns `DateTimeError::InvalidTimezone` if the value carries a non-UTC
/// offset; convert it explicitly instead.
pub fn as_utc(dt: impl Into<Moment>) -> DateTimeResult<DateTime<Utc>> {
    match dt.into() {
        Moment::Aware(dt) => {
            if dt.offset().fix().local_minus_utc() != 0 {
                return Err(DateTimeError::InvalidTimezone(dt.to_rfc3339()));
            }
            Ok(dt.with_timezone(&Utc))
        }
        naive => Ok(Utc.from_utc_datetime(&naive.naive_local())),
    }
}

/// ## Summary
/// Attaches `timezone` to a naive wall-clock time.
///
/// A time inside a DST fold resolves to its standard-time occurrence.
///
/// ## Errors
/// Returns `DateTimeError::NonExistentTime` if the time falls into a DST gap.
pub fn localize(naive: NaiveDateTime, timezone: Tz) -> DateTimeResult<DateTime<Tz>> {
    match timezone.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Ok(dt),
        LocalResult::Ambiguous(earliest, latest) => {
            tracing::trace!(%naive, %timezone, "Ambiguous local time, using standard time");
            if earliest.offset().dst_offset().is_zero() {
                Ok(earliest)
            } else {
                Ok(latest)
            }
        }
        LocalResult::None => Err(DateTimeError::NonExistentTime(format!(
            "{naive} in timezone {timezone}"
        ))),
    }
}

/// ## Summary
/// Interprets a naive datetime as wall-clock time in `timezone` (UTC if
/// `None`) and returns it in UTC.
///
/// ## Errors
/// Returns `DateTimeError::NonExistentTime` if the time falls into a DST gap.
pub fn localize_as_utc(naive: NaiveDateTime, timezone: Option<Tz>) -> DateTimeResult<DateTime<Utc>> {
    let local = localize(naive, timezone.unwrap_or(Tz::UTC))?;
    Ok(local.with_timezone(&Utc))
}

/// ## Summary
/// Converts a naive datetime holding the server's wall-clock time to UTC.
///
/// ## Errors
/// Returns `DateTimeError::NonExistentTime` if the time falls into a DST gap.
pub fn server_to_utc(naive: NaiveDateTime, config: &TimeConfig) -> DateTimeResult<DateTime<Utc>> {
    localize_as_utc(naive, Some(config.server_timezone))
}

/// ## Summary
/// Converts an instant to the server's timezone.
#[must_use]
pub fn utc_to_server<Z: TimeZone>(dt: &DateTime<Z>, config: &TimeConfig) -> DateTime<Tz> {
    dt.with_timezone(&config.server_timezone)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn naive(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn test_now_utc_inexact_truncates() {
        let now = now_utc(false);
        assert_eq!(now.second(), 0);
        assert_eq!(now.nanosecond(), 0);
        assert_eq!(now.offset().fix().local_minus_utc(), 0);
    }

    #[test]
    fn test_as_utc_tags_naive() {
        let dt = as_utc(naive(2026, 5, 1, 9, 30)).unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2026, 5, 1, 9, 30, 0).unwrap());
    }

    #[test]
    fn test_as_utc_passes_utc_through() {
        let utc = Utc.with_ymd_and_hms(2026, 5, 1, 9, 30, 0).unwrap();
        assert_eq!(as_utc(utc).unwrap(), utc);
        assert_eq!(as_utc(utc.with_timezone(&Tz::Etc__UTC)).unwrap(), utc);
    }

    #[test]
    fn test_as_utc_rejects_offset() {
        let paris = Tz::Europe__Paris
            .with_ymd_and_hms(2026, 5, 1, 9, 30, 0)
            .unwrap();
        assert!(matches!(
            as_utc(paris),
            Err(DateTimeError::InvalidTimezone(_))
        ));
    }

    #[test]
    fn test_localize_as_utc() {
        // CEST is UTC+2
        let dt = localize_as_utc(naive(2026, 7, 1, 12, 0), Some(Tz::Europe__Zurich)).unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2026, 7, 1, 10, 0, 0).unwrap());

        let dt = localize_as_utc(naive(2026, 7, 1, 12, 0), None).unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2026, 7, 1, 12, 0, 0).unwrap());
    }

    #[test]
    fn test_localize_dst_gap() {
        // 02:30 does not exist in New York on 2026-03-08
        let result = localize(naive(2026, 3, 8, 2, 30), Tz::America__New_York);
        assert!(matches!(result, Err(DateTimeError::NonExistentTime(_))));
    }

    #[test]
    fn test_localize_dst_fold_uses_standard_time() {
        // 01:30 happens twice in New York on 2026-11-01, second as EST (UTC-5)
        let dt = localize(naive(2026, 11, 1, 1, 30), Tz::America__New_York).unwrap();
        assert_eq!(
            dt.with_timezone(&Utc),
            Utc.with_ymd_and_hms(2026, 11, 1, 6, 30, 0).unwrap()
        );
        assert!(dt.offset().dst_offset().is_zero());

        // Same in Berlin: 02:30 on 2026-10-25 resolves to CET (UTC+1)
        let dt = localize(naive(2026, 10, 25, 2, 30), Tz::Europe__Berlin).unwrap();
        assert_eq!(
            dt.with_timezone(&Utc),
            Utc.with_ymd_and_hms(2026, 10, 25, 1, 30, 0).unwrap()
        );
    }

    #[test]
    fn test_server_round_trip() {
        let config = TimeConfig::new(Tz::America__New_York, icu::locale::locale!("en"));
        let wall_clock = naive(2026, 1, 15, 10, 0);

        let utc = server_to_utc(wall_clock, &config).unwrap();
        assert_eq!(utc, Utc.with_ymd_and_hms(2026, 1, 15, 15, 0, 0).unwrap());

        let back = utc_to_server(&utc, &config);
        assert_eq!(back.naive_local(), wall_clock);
        assert_eq!(back.timezone(), Tz::America__New_York);
    }
}
