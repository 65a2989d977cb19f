//! Parsing of timezone and locale identifiers coming from configuration or
//! user preferences.

use std::str::FromStr;

use chrono_tz::Tz;
use icu::locale::Locale;

use crate::error::{CoreError, CoreResult};

/// ## Summary
/// Resolves an IANA timezone name such as `Europe/Zurich`.
///
/// ## Errors
/// Returns `CoreError::UnknownTimezone` if the name is not in the timezone database.
pub fn parse_timezone(name: &str) -> CoreResult<Tz> {
    Tz::from_str(name.trim()).map_err(|_err| CoreError::UnknownTimezone(name.to_string()))
}

/// ## Summary
/// Parses a locale identifier.
///
/// Both BCP-47 (`en-GB`) and POSIX-style (`en_GB`) separators are accepted.
///
/// ## Errors
/// Returns `CoreError::UnknownLocale` if the identifier is malformed.
pub fn parse_locale(id: &str) -> CoreResult<Locale> {
    let normalized = id.trim().replace('_', "-");
    normalized
        .parse::<Locale>()
        .map_err(|_err| CoreError::UnknownLocale(id.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timezone() {
        assert_eq!(parse_timezone("UTC").unwrap(), Tz::UTC);
        assert_eq!(
            parse_timezone("America/New_York").unwrap(),
            Tz::America__New_York
        );
    }

    #[test]
    fn test_parse_timezone_trims() {
        assert_eq!(parse_timezone(" Europe/Paris ").unwrap(), Tz::Europe__Paris);
    }

    #[test]
    fn test_parse_timezone_unknown() {
        assert!(matches!(
            parse_timezone("Nowhere/Special"),
            Err(CoreError::UnknownTimezone(_))
        ));
    }

    #[test]
    fn test_parse_locale_posix_separator() {
        assert_eq!(parse_locale("en_GB").unwrap().to_string(), "en-GB");
    }

    #[test]
    fn test_parse_locale_bcp47() {
        assert_eq!(parse_locale("fr-CA").unwrap().to_string(), "fr-CA");
        assert_eq!(parse_locale("de").unwrap().to_string(), "de");
    }

    #[test]
    fn test_parse_locale_invalid() {
        assert!(matches!(
            parse_locale("not a locale!"),
            Err(CoreError::UnknownLocale(_))
        ));
    }
}
