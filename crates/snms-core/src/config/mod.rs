use anyhow::Result;
use chrono_tz::Tz;
use config::Config;
use icu::locale::Locale;
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

use crate::error::CoreResult;
use crate::util::ident::{parse_locale, parse_timezone};

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub logging: LoggingConfig,
    pub time: TimeSettings,
}

/// Log verbosity for the host process. The library crates only emit
/// `tracing` events; the binary that loads these settings installs the
/// subscriber with [`LoggingConfig::env_filter`].
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// An `EnvFilter` directive such as `info` or `snms_datetime=trace,warn`.
    pub level: String,
}

impl LoggingConfig {
    /// ## Summary
    /// Builds the log filter for the configured level, falling back to
    /// `info` when the directive cannot be parsed.
    #[must_use]
    pub fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_new(self.level.as_str()).unwrap_or_else(|err| {
            tracing::warn!(level = %self.level, error = %err, "Invalid log level in config, using info");
            EnvFilter::new("info")
        })
    }
}

/// Process-wide date/time defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct TimeSettings {
    /// IANA name of the timezone the server's wall clock runs in.
    pub default_timezone: String,
    /// Locale used when a caller provides none, e.g. `en_GB`.
    pub default_locale: String,
}

impl TimeSettings {
    /// ## Summary
    /// Resolves the configured server timezone.
    ///
    /// ## Errors
    /// Returns `CoreError::UnknownTimezone` if the name is not in the timezone database.
    pub fn timezone(&self) -> CoreResult<Tz> {
        parse_timezone(&self.default_timezone)
    }

    /// ## Summary
    /// Resolves the configured default locale.
    ///
    /// ## Errors
    /// Returns `CoreError::UnknownLocale` if the identifier is malformed.
    pub fn locale(&self) -> CoreResult<Locale> {
        parse_locale(&self.default_locale)
    }
}

impl Default for TimeSettings {
    fn default() -> Self {
        Self {
            default_timezone: "UTC".to_string(),
            default_locale: "en_GB".to_string(),
        }
    }
}

impl Settings {
    /// ## Summary
    /// Loads configuration from defaults, an optional `config.toml` and
    /// `SNMS__`-prefixed environment variables, in increasing precedence.
    ///
    /// ## Errors
    /// Returns an error if building the configuration or deserializing it fails.
    pub fn load() -> Result<Self> {
        Ok(Config::builder()
            .set_default("logging.level", "info")?
            .set_default("time.default_timezone", "UTC")?
            .set_default("time.default_locale", "en_GB")?
            // TOML file
            .add_source(config::File::with_name("config.toml").required(false))
            // Env
            .add_source(
                config::Environment::with_prefix("SNMS")
                    .separator("__")
                    .ignore_empty(true)
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize::<Settings>()?)
    }
}

/// ## Summary
/// Loads configuration from environment variables and `.env` file. This is
/// the entry point for the host binary.
///
/// ## Errors
/// Returns an error if loading or deserializing the configuration fails.
pub fn load_config() -> Result<Settings> {
    dotenvy::dotenv().ok();

    let settings = Settings::load()?;
    tracing::debug!(
        timezone = %settings.time.default_timezone,
        locale = %settings.time.default_locale,
        "Configuration loaded"
    );
    Ok(settings)
}
