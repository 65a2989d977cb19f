//! Time units and their localized phrasing.

use icu::experimental::duration::options::{BaseStyle, DurationFormatterOptions, FieldDisplay};
use icu::experimental::duration::{
    Duration, DurationFormatter, DurationFormatterPreferences, DurationSign,
    ValidatedDurationFormatterOptions,
};
use icu::locale::Locale;

use crate::error::{DateTimeError, DateTimeResult};

/// A calendar or clock unit, coarsest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeUnit {
    Year,
    Month,
    Week,
    Day,
    Hour,
    Minute,
    Second,
}

impl TimeUnit {
    /// All units from coarsest to finest.
    pub const ALL: [Self; 7] = [
        Self::Year,
        Self::Month,
        Self::Week,
        Self::Day,
        Self::Hour,
        Self::Minute,
        Self::Second,
    ];

    /// Nominal length of the unit in seconds (a month is 30 days, a year 365).
    #[must_use]
    pub const fn seconds(self) -> i64 {
        match self {
            Self::Year => 365 * 86_400,
            Self::Month => 30 * 86_400,
            Self::Week => 7 * 86_400,
            Self::Day => 86_400,
            Self::Hour => 3_600,
            Self::Minute => 60,
            Self::Second => 1,
        }
    }

    /// A duration holding `count` of this unit, and options that show the
    /// unit even when `count` is zero.
    fn duration(self, count: u64, options: &mut DurationFormatterOptions) -> Duration {
        let mut duration = Duration::new();
        let (field, visibility) = match self {
            Self::Year => (&mut duration.years, &mut options.year_visibility),
            Self::Month => (&mut duration.months, &mut options.month_visibility),
            Self::Week => (&mut duration.weeks, &mut options.week_visibility),
            Self::Day => (&mut duration.days, &mut options.day_visibility),
            Self::Hour => (&mut duration.hours, &mut options.hour_visibility),
            Self::Minute => (&mut duration.minutes, &mut options.minute_visibility),
            Self::Second => (&mut duration.seconds, &mut options.second_visibility),
        };
        *field = count;
        *visibility = Some(FieldDisplay::Always);
        duration
    }
}

/// How verbosely a unit is written, e.g. `3 minutes`, `3 min` or `3m` in
/// English.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnitStyle {
    #[default]
    Long,
    Short,
    Narrow,
}

impl From<UnitStyle> for BaseStyle {
    fn from(style: UnitStyle) -> Self {
        match style {
            UnitStyle::Long => Self::Long,
            UnitStyle::Short => Self::Short,
            UnitStyle::Narrow => Self::Narrow,
        }
    }
}

/// Renders `<count> <unit>` phrases with the unit names and plural rules of
/// a locale.
#[derive(Debug, Clone, Copy)]
pub struct UnitPhrases {
    prefs: DurationFormatterPreferences,
}

impl UnitPhrases {
    #[must_use]
    pub fn new(locale: &Locale) -> Self {
        Self {
            prefs: locale.into(),
        }
    }

    /// ## Summary
    /// Returns the phrase for `count` units, e.g. `1 hour`, `5 hours` or
    /// `5h` in English and `5 Stunden` in German.
    ///
    /// ## Errors
    /// Returns `DateTimeError::Icu` if the locale has no unit data.
    pub fn phrase(&self, unit: TimeUnit, style: UnitStyle, count: i64) -> DateTimeResult<String> {
        let mut options = DurationFormatterOptions::default();
        options.base = style.into();

        let mut duration = unit.duration(count.unsigned_abs(), &mut options);
        if count < 0 {
            duration.sign = DurationSign::Negative;
        }

        let options = ValidatedDurationFormatterOptions::validate(options)
            .map_err(|err| DateTimeError::Icu(err.to_string()))?;
        let formatter = DurationFormatter::try_new(self.prefs, options)
            .map_err(|err| DateTimeError::Icu(err.to_string()))?;
        Ok(formatter.format(&duration).to_string())
    }
}
