//! Explicit formatting context: the locale and timezone preferences that
//! would otherwise be read from the current request.

use chrono_tz::Tz;
use icu::locale::{Locale, locale};
use snms_core::config::TimeSettings;

use crate::error::DateTimeResult;

/// Process-wide date/time configuration, built once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeConfig {
    /// Timezone of the server's naive wall clock.
    pub server_timezone: Tz,
    /// Locale used when neither the caller nor the request provides one.
    pub default_locale: Locale,
}

impl TimeConfig {
    #[must_use]
    pub fn new(server_timezone: Tz, default_locale: Locale) -> Self {
        Self {
            server_timezone,
            default_locale,
        }
    }

    /// ## Summary
    /// Builds the configuration from loaded settings.
    ///
    /// ## Errors
    /// Returns an error if the configured timezone or locale cannot be resolved.
    pub fn from_settings(settings: &TimeSettings) -> DateTimeResult<Self> {
        let config = Self::new(settings.timezone()?, settings.locale()?);
        tracing::debug!(
            server_timezone = %config.server_timezone,
            default_locale = %config.default_locale,
            "Time configuration resolved"
        );
        Ok(config)
    }
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self::new(Tz::UTC, locale!("en-GB"))
    }
}

/// Per-call formatting preferences.
///
/// Borrows the process configuration and optionally carries the locale and
/// timezone of the user on whose behalf something is being rendered.
#[derive(Debug, Clone)]
pub struct FormatContext<'a> {
    config: &'a TimeConfig,
    locale: Option<Locale>,
    session_timezone: Option<Tz>,
}

impl<'a> FormatContext<'a> {
    #[must_use]
    pub fn new(config: &'a TimeConfig) -> Self {
        Self {
            config,
            locale: None,
            session_timezone: None,
        }
    }

    #[must_use]
    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = Some(locale);
        self
    }

    #[must_use]
    pub fn with_session_timezone(mut self, timezone: Tz) -> Self {
        self.session_timezone = Some(timezone);
        self
    }

    #[must_use]
    pub fn config(&self) -> &'a TimeConfig {
        self.config
    }

    #[must_use]
    pub fn session_timezone(&self) -> Option<Tz> {
        self.session_timezone
    }

    /// ## Summary
    /// Picks the locale to render with: the explicit one, then the context's,
    /// then the configured default.
    #[must_use]
    pub fn resolve_locale<'b>(&'b self, explicit: Option<&'b Locale>) -> &'b Locale {
        explicit
            .or(self.locale.as_ref())
            .unwrap_or(&self.config.default_locale)
    }

    /// ## Summary
    /// Timezone used to display values when no user preference applies.
    #[must_use]
    pub fn display_timezone(&self) -> Tz {
        self.config.server_timezone
    }
}
