//! Locale-aware rendering of dates, times, numbers and durations.

use std::fmt::Write;

use chrono::format::StrftimeItems;
use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, TimeZone, Timelike, Utc};
use chrono_tz::Tz;
use fixed_decimal::{Decimal, FloatPrecision, SignedRoundingMode, UnsignedRoundingMode};
use icu::calendar::{Date, Iso};
use icu::datetime::fieldsets::{E, T, YMD, YMDE};
use icu::datetime::{DateTimeFormatter, DateTimeFormatterPreferences, NoCalendarFormatter};
use icu::decimal::DecimalFormatter;
use icu::decimal::options::DecimalFormatterOptions;
use icu::locale::Locale;
use icu::time::{DateTime as IcuDateTime, Time};

use crate::context::FormatContext;
use crate::error::{DateTimeError, DateTimeResult};
use crate::moment::Moment;
use crate::units::{TimeUnit, UnitPhrases, UnitStyle};

const CODE_DATE: &str = "%d/%m/%Y";
const CODE_TIME: &str = "%H:%M";
const CODE_DATETIME: &str = "%d/%m/%Y %H:%M";

/// Default rounding threshold for [`format_timedelta`].
pub const DEFAULT_THRESHOLD: f64 = 0.85;

/// A named locale format, the fixed machine-readable `code` format, or a
/// strftime pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Format {
    Short,
    Medium,
    Long,
    Full,
    /// `dd/MM/yyyy`, `HH:mm` or both, regardless of locale.
    Code,
    /// A chrono strftime pattern such as `%d.%m.%Y %H:%M`.
    ///
    /// LDML patterns (`dd.MM.yyyy`) are not translated: letters outside a
    /// `%` specifier are copied to the output as-is.
    Pattern(String),
}

impl From<&str> for Format {
    fn from(value: &str) -> Self {
        match value {
            "short" => Self::Short,
            "medium" => Self::Medium,
            "long" => Self::Long,
            "full" => Self::Full,
            "code" => Self::Code,
            pattern => Self::Pattern(pattern.to_string()),
        }
    }
}

/// Which timezone a time or datetime is rendered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayZone {
    /// Aware values use the session timezone if one is set, otherwise their
    /// own; naive values are rendered as-is.
    #[default]
    Auto,
    /// Aware values are converted; naive values are taken as UTC and converted.
    Explicit(Tz),
    /// Naive values are taken as UTC and shown in the configured server
    /// timezone; aware values behave as in `Auto`.
    Server,
    /// Render in the value's own timezone.
    Keep,
}

/// ## Summary
/// Returns the wall-clock time `moment` should be rendered with.
pub(crate) fn display_wall_clock(
    moment: Moment,
    zone: DisplayZone,
    ctx: &FormatContext<'_>,
) -> NaiveDateTime {
    let target = match zone {
        DisplayZone::Auto | DisplayZone::Server if moment.is_aware() => ctx.session_timezone(),
        DisplayZone::Auto | DisplayZone::Keep => None,
        DisplayZone::Explicit(tz) => Some(tz),
        DisplayZone::Server => Some(ctx.config().server_timezone),
    };
    tracing::trace!(?zone, ?target, "Resolved display timezone");

    match (moment, target) {
        (Moment::Aware(dt), Some(tz)) => dt.with_timezone(&tz).naive_local(),
        (Moment::Naive(naive), Some(tz)) => Utc.from_utc_datetime(&naive).with_timezone(&tz).naive_local(),
        (moment, _) => moment.naive_local(),
    }
}

/// ## Summary
/// Formats a date.
///
/// When `timezone` is given and `d` is timezone-aware, the date is taken in
/// that timezone.
///
/// ## Errors
/// Returns an error if locale data is unavailable or a pattern is invalid.
pub fn format_date(
    d: impl Into<Moment>,
    format: &Format,
    locale: Option<&Locale>,
    timezone: Option<Tz>,
    ctx: &FormatContext<'_>,
) -> DateTimeResult<String> {
    let date = match (d.into(), timezone) {
        (Moment::Aware(dt), Some(tz)) => dt.with_timezone(&tz).date_naive(),
        (moment, _) => moment.date(),
    };
    let locale = ctx.resolve_locale(locale);

    match format {
        Format::Code => render_pattern(date.and_time(NaiveTime::MIN), CODE_DATE),
        Format::Pattern(pattern) => render_pattern(date.and_time(NaiveTime::MIN), pattern),
        named => render_date(date, named, locale),
    }
}

/// ## Summary
/// Formats the time of day of `t`.
///
/// ## Errors
/// Returns an error if locale data is unavailable or a pattern is invalid.
pub fn format_time(
    t: impl Into<Moment>,
    format: &Format,
    locale: Option<&Locale>,
    zone: DisplayZone,
    ctx: &FormatContext<'_>,
) -> DateTimeResult<String> {
    let wall_clock = display_wall_clock(t.into(), zone, ctx);
    let locale = ctx.resolve_locale(locale);

    match format {
        Format::Code => render_pattern(wall_clock, CODE_TIME),
        Format::Pattern(pattern) => render_pattern(wall_clock, pattern),
        named => render_time(wall_clock.time(), named, locale),
    }
}

/// ## Summary
/// Formats a date and time.
///
/// ## Errors
/// Returns an error if locale data is unavailable or a pattern is invalid.
pub fn format_datetime(
    dt: impl Into<Moment>,
    format: &Format,
    locale: Option<&Locale>,
    zone: DisplayZone,
    ctx: &FormatContext<'_>,
) -> DateTimeResult<String> {
    let wall_clock = display_wall_clock(dt.into(), zone, ctx);
    let locale = ctx.resolve_locale(locale);

    match format {
        Format::Code => render_pattern(wall_clock, CODE_DATETIME),
        Format::Pattern(pattern) => render_pattern(wall_clock, pattern),
        named => render_datetime(wall_clock, named, locale),
    }
}

/// ## Summary
/// Formats a number with the grouping and decimal separators of the locale,
/// keeping at most three fraction digits.
///
/// ## Errors
/// Returns `DateTimeError::InvalidNumber` for NaN or infinite input.
pub fn format_number(
    number: f64,
    locale: Option<&Locale>,
    ctx: &FormatContext<'_>,
) -> DateTimeResult<String> {
    let mut decimal = Decimal::try_from_f64(number, FloatPrecision::RoundTrip)
        .map_err(|_err| DateTimeError::InvalidNumber(number.to_string()))?;
    decimal.round_with_mode(
        -3,
        SignedRoundingMode::Unsigned(UnsignedRoundingMode::HalfEven),
    );
    decimal.absolute.trim_end();

    let formatter = DecimalFormatter::try_new(
        ctx.resolve_locale(locale).into(),
        DecimalFormatterOptions::default(),
    )
    .map_err(|err| DateTimeError::Icu(err.to_string()))?;
    Ok(formatter.format(&decimal).to_string())
}

/// ## Summary
/// Renders a duration as a single rounded unit, e.g. `3 hours`.
///
/// The coarsest unit whose value reaches `threshold` is chosen, so with the
/// default threshold 0.85 a duration of 52 minutes reads `1 hour`. The sign
/// of the duration is ignored.
///
/// ## Errors
/// Returns `DateTimeError::Icu` if unit data is unavailable.
#[expect(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    reason = "durations are far below the range where f64 loses whole seconds"
)]
pub fn format_timedelta(
    delta: TimeDelta,
    style: UnitStyle,
    threshold: f64,
    locale: Option<&Locale>,
    ctx: &FormatContext<'_>,
) -> DateTimeResult<String> {
    let phrases = UnitPhrases::new(ctx.resolve_locale(locale));
    let seconds = (delta.num_milliseconds() as f64 / 1000.0).abs();

    for unit in TimeUnit::ALL {
        let value = seconds / unit.seconds() as f64;
        if value >= threshold {
            let rounded = (value.round() as i64).max(1);
            return phrases.phrase(unit, style, rounded);
        }
    }

    phrases.phrase(TimeUnit::Second, style, seconds.round() as i64)
}

fn icu_err(err: impl std::fmt::Display) -> DateTimeError {
    DateTimeError::Icu(err.to_string())
}

pub(crate) fn icu_date(date: NaiveDate) -> DateTimeResult<Date<Iso>> {
    let month = u8::try_from(date.month()).map_err(|err| DateTimeError::InvalidDate(err.to_string()))?;
    let day = u8::try_from(date.day()).map_err(|err| DateTimeError::InvalidDate(err.to_string()))?;
    Date::try_new_iso(date.year(), month, day).map_err(|err| DateTimeError::InvalidDate(err.to_string()))
}

pub(crate) fn icu_time(time: NaiveTime) -> DateTimeResult<Time> {
    let to_u8 = |value: u32| u8::try_from(value).map_err(|err| DateTimeError::InvalidDate(err.to_string()));
    Time::try_new(to_u8(time.hour())?, to_u8(time.minute())?, to_u8(time.second())?, 0)
        .map_err(|err| DateTimeError::InvalidDate(err.to_string()))
}

fn prefs(locale: &Locale) -> DateTimeFormatterPreferences {
    locale.into()
}

/// Locale date in one of the named lengths; `Full` adds the weekday.
pub(crate) fn render_date(date: NaiveDate, format: &Format, locale: &Locale) -> DateTimeResult<String> {
    let date = icu_date(date)?;
    let rendered = match format {
        Format::Short => DateTimeFormatter::try_new(prefs(locale), YMD::short())
            .map_err(icu_err)?
            .format(&date)
            .to_string(),
        Format::Long => DateTimeFormatter::try_new(prefs(locale), YMD::long())
            .map_err(icu_err)?
            .format(&date)
            .to_string(),
        Format::Full => DateTimeFormatter::try_new(prefs(locale), YMDE::long())
            .map_err(icu_err)?
            .format(&date)
            .to_string(),
        Format::Medium | Format::Code | Format::Pattern(_) => {
            DateTimeFormatter::try_new(prefs(locale), YMD::medium())
                .map_err(icu_err)?
                .format(&date)
                .to_string()
        }
    };
    Ok(rendered)
}

/// Locale time of day; `Short` omits seconds.
pub(crate) fn render_time(time: NaiveTime, format: &Format, locale: &Locale) -> DateTimeResult<String> {
    let time = icu_time(time)?;
    let field_set = match format {
        Format::Short => T::hm(),
        _ => T::hms(),
    };
    Ok(NoCalendarFormatter::try_new(prefs(locale), field_set)
        .map_err(icu_err)?
        .format(&time)
        .to_string())
}

fn render_datetime(wall_clock: NaiveDateTime, format: &Format, locale: &Locale) -> DateTimeResult<String> {
    let datetime = IcuDateTime {
        date: icu_date(wall_clock.date())?,
        time: icu_time(wall_clock.time())?,
    };
    let rendered = match format {
        Format::Short => DateTimeFormatter::try_new(prefs(locale), YMD::short().with_time_hm())
            .map_err(icu_err)?
            .format(&datetime)
            .to_string(),
        Format::Long => DateTimeFormatter::try_new(prefs(locale), YMD::long().with_time_hms())
            .map_err(icu_err)?
            .format(&datetime)
            .to_string(),
        Format::Full => DateTimeFormatter::try_new(prefs(locale), YMDE::long().with_time_hms())
            .map_err(icu_err)?
            .format(&datetime)
            .to_string(),
        Format::Medium | Format::Code | Format::Pattern(_) => {
            DateTimeFormatter::try_new(prefs(locale), YMD::medium().with_time_hms())
                .map_err(icu_err)?
                .format(&datetime)
                .to_string()
        }
    };
    Ok(rendered)
}

/// Full weekday name, e.g. `Monday`.
pub(crate) fn render_weekday(date: NaiveDate, locale: &Locale) -> DateTimeResult<String> {
    let date = icu_date(date)?;
    Ok(DateTimeFormatter::try_new(prefs(locale), E::long())
        .map_err(icu_err)?
        .format(&date)
        .to_string())
}

fn render_pattern(wall_clock: NaiveDateTime, pattern: &str) -> DateTimeResult<String> {
    let items = StrftimeItems::new(pattern)
        .parse()
        .map_err(|_err| DateTimeError::InvalidFormat(pattern.to_string()))?;
    let mut rendered = String::new();
    write!(rendered, "{}", wall_clock.format_with_items(items.iter()))
        .map_err(|_err| DateTimeError::InvalidFormat(pattern.to_string()))?;
    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::TimeConfig;
    use icu::locale::locale;

    fn naive(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    fn config() -> TimeConfig {
        TimeConfig::new(Tz::Europe__Zurich, locale!("en"))
    }

    #[test]
    fn test_pattern_letters_are_literal() {
        let config = config();
        let ctx = FormatContext::new(&config);
        let dt = naive(2026, 3, 7, 14, 5, 42);

        assert_eq!(
            format_date(dt, &Format::from("%d.%m.%Y"), None, None, &ctx).unwrap(),
            "07.03.2026"
        );
        assert_eq!(
            format_date(dt, &Format::from("dd.MM.yyyy"), None, None, &ctx).unwrap(),
            "dd.MM.yyyy"
        );
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!(Format::from("short"), Format::Short);
        assert_eq!(Format::from("code"), Format::Code);
        assert_eq!(Format::from("%Y"), Format::Pattern("%Y".to_string()));
    }

    #[test]
    fn test_code_format_ignores_locale() {
        let config = config();
        let ctx = FormatContext::new(&config).with_locale(locale!("ja"));
        let dt = naive(2026, 3, 7, 8, 5, 42);

        assert_eq!(format_date(dt, &Format::Code, None, None, &ctx).unwrap(), "07/03/2026");
        assert_eq!(
            format_time(dt, &Format::Code, None, DisplayZone::Auto, &ctx).unwrap(),
            "08:05"
        );
        assert_eq!(
            format_datetime(dt, &Format::Code, None, DisplayZone::Auto, &ctx).unwrap(),
            "07/03/2026 08:05"
        );
    }

    #[test]
    fn test_pattern_format() {
        let config = config();
        let ctx = FormatContext::new(&config);
        let dt = naive(2026, 3, 7, 8, 5, 42);

        assert_eq!(
            format_datetime(dt, &Format::from("%Y-%m-%d %H:%M:%S"), None, DisplayZone::Auto, &ctx)
                .unwrap(),
            "2026-03-07 08:05:42"
        );
    }

    #[test]
    fn test_invalid_pattern() {
        let config = config();
        let ctx = FormatContext::new(&config);
        let date = NaiveDate::from_ymd_opt(2026, 3, 7).unwrap();

        assert!(matches!(
            format_date(date, &Format::from("%Q"), None, None, &ctx),
            Err(DateTimeError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_format_date_localized() {
        let config = config();
        let ctx = FormatContext::new(&config);
        let date = NaiveDate::from_ymd_opt(2026, 3, 7).unwrap();

        let rendered = format_date(date, &Format::Long, None, None, &ctx).unwrap();
        assert!(rendered.contains("March"), "{rendered}");
        assert!(rendered.contains("2026"), "{rendered}");

        let german = locale!("de");
        let rendered = format_date(date, &Format::Long, Some(&german), None, &ctx).unwrap();
        assert!(rendered.contains("März"), "{rendered}");
    }

    #[test]
    fn test_format_date_converts_aware_input() {
        let config = config();
        let ctx = FormatContext::new(&config);
        let utc = Utc.with_ymd_and_hms(2026, 3, 7, 23, 30, 0).unwrap();

        let same = format_date(utc, &Format::Code, None, None, &ctx).unwrap();
        let tokyo = format_date(utc, &Format::Code, None, Some(Tz::Asia__Tokyo), &ctx).unwrap();
        assert_eq!(same, "07/03/2026");
        assert_eq!(tokyo, "08/03/2026");
    }

    #[test]
    fn test_display_zone_resolution() {
        let config = config();
        let plain = FormatContext::new(&config);
        let session = FormatContext::new(&config).with_session_timezone(Tz::Asia__Tokyo);
        let utc = Utc.with_ymd_and_hms(2026, 1, 10, 12, 0, 0).unwrap();
        let moment = Moment::from(utc);
        let naive = naive(2026, 1, 10, 12, 0, 0);

        // Aware values follow the session timezone, naive ones stay untouched
        assert_eq!(display_wall_clock(moment, DisplayZone::Auto, &plain).hour(), 12);
        assert_eq!(display_wall_clock(moment, DisplayZone::Auto, &session).hour(), 21);
        assert_eq!(display_wall_clock(Moment::from(naive), DisplayZone::Auto, &session).hour(), 12);

        // Server timezone only applies to naive values: Zurich is UTC+1 in January
        assert_eq!(display_wall_clock(Moment::from(naive), DisplayZone::Server, &plain).hour(), 13);
        assert_eq!(display_wall_clock(Moment::from(naive), DisplayZone::Server, &session).hour(), 13);
        assert_eq!(display_wall_clock(moment, DisplayZone::Server, &session).hour(), 21);
        assert_eq!(display_wall_clock(moment, DisplayZone::Server, &plain).hour(), 12);

        assert_eq!(
            display_wall_clock(moment, DisplayZone::Explicit(Tz::America__New_York), &session).hour(),
            7
        );
        assert_eq!(display_wall_clock(moment, DisplayZone::Keep, &session).hour(), 12);
    }

    #[test]
    fn test_format_time_short_omits_seconds() {
        let config = config();
        let ctx = FormatContext::new(&config).with_locale(locale!("de"));
        let dt = naive(2026, 3, 7, 14, 5, 42);

        let short = format_time(dt, &Format::Short, None, DisplayZone::Auto, &ctx).unwrap();
        assert_eq!(short, "14:05");

        let medium = format_time(dt, &Format::Medium, None, DisplayZone::Auto, &ctx).unwrap();
        assert_eq!(medium, "14:05:42");
    }

    #[test]
    fn test_format_datetime_contains_parts() {
        let config = config();
        let ctx = FormatContext::new(&config).with_locale(locale!("de"));
        let dt = naive(2026, 3, 7, 14, 5, 42);

        let rendered = format_datetime(dt, &Format::Short, None, DisplayZone::Auto, &ctx).unwrap();
        assert!(rendered.contains("14:05"), "{rendered}");
        assert!(rendered.contains("07.03.26"), "{rendered}");
    }

    #[test]
    fn test_format_number() {
        let config = config();
        let ctx = FormatContext::new(&config);

        assert_eq!(format_number(1234.5, None, &ctx).unwrap(), "1,234.5");
        assert_eq!(format_number(1_000_000.0, None, &ctx).unwrap(), "1,000,000");
        assert_eq!(format_number(0.123_456, None, &ctx).unwrap(), "0.123");

        let german = locale!("de");
        assert_eq!(format_number(1234.5, Some(&german), &ctx).unwrap(), "1.234,5");
    }

    #[test]
    fn test_format_number_rejects_nan() {
        let config = config();
        let ctx = FormatContext::new(&config);
        assert!(matches!(
            format_number(f64::NAN, None, &ctx),
            Err(DateTimeError::InvalidNumber(_))
        ));
    }

    #[test]
    fn test_format_timedelta_threshold() {
        let config = config();
        let ctx = FormatContext::new(&config);
        let fmt = |delta| format_timedelta(delta, UnitStyle::Long, DEFAULT_THRESHOLD, None, &ctx).unwrap();

        assert_eq!(fmt(TimeDelta::minutes(52)), "1 hour");
        assert_eq!(fmt(TimeDelta::minutes(50)), "50 minutes");
        assert_eq!(fmt(TimeDelta::hours(3)), "3 hours");
        assert_eq!(fmt(TimeDelta::days(-2)), "2 days");
        assert_eq!(fmt(TimeDelta::days(14)), "2 weeks");
        assert_eq!(fmt(TimeDelta::seconds(1)), "1 second");
        assert_eq!(fmt(TimeDelta::zero()), "0 seconds");
    }

    #[test]
    fn test_format_timedelta_styles() {
        let config = config();
        let ctx = FormatContext::new(&config);

        assert_eq!(
            format_timedelta(TimeDelta::hours(3), UnitStyle::Short, DEFAULT_THRESHOLD, None, &ctx)
                .unwrap(),
            "3 hr"
        );
        assert_eq!(
            format_timedelta(TimeDelta::hours(3), UnitStyle::Narrow, DEFAULT_THRESHOLD, None, &ctx)
                .unwrap(),
            "3h"
        );
        // A stricter threshold keeps the finer unit
        assert_eq!(
            format_timedelta(TimeDelta::minutes(52), UnitStyle::Long, 1.0, None, &ctx).unwrap(),
            "52 minutes"
        );
    }

    #[test]
    fn test_format_timedelta_localized_units() {
        let config = config();
        let ctx = FormatContext::new(&config).with_locale(locale!("de"));

        assert_eq!(
            format_timedelta(TimeDelta::hours(3), UnitStyle::Long, DEFAULT_THRESHOLD, None, &ctx).unwrap(),
            "3 Stunden"
        );
        assert_eq!(
            format_timedelta(TimeDelta::days(2), UnitStyle::Long, DEFAULT_THRESHOLD, Some(&locale!("fr")), &ctx)
                .unwrap(),
            "2 jours"
        );
    }

    #[test]
    fn test_render_weekday() {
        let monday = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        assert_eq!(render_weekday(monday, &locale!("en")).unwrap(), "Monday");
        assert_eq!(render_weekday(monday, &locale!("fr")).unwrap(), "lundi");
    }
}
