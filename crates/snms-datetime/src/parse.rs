//! Reading a datetime back out of submitted form fields.

use std::collections::HashMap;
use std::hash::BuildHasher;

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M";

fn field<'a, S: BuildHasher>(
    fields: &'a HashMap<String, String, S>,
    prefix: &str,
    name: &str,
) -> Option<&'a str> {
    fields
        .get(&format!("{prefix}{name}"))
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
}

/// ## Summary
/// Combines `<prefix>date` (`YYYY-MM-DD`) and `<prefix>time` (`HH:MM`) from
/// `fields` into one naive datetime.
///
/// Each part that is missing or malformed is taken from `default` instead,
/// or from the current local time when no default is given. Malformed input
/// is logged and otherwise ignored.
#[must_use]
pub fn datetime_from_fields<S: BuildHasher>(
    fields: &HashMap<String, String, S>,
    prefix: &str,
    default: Option<NaiveDateTime>,
) -> NaiveDateTime {
    let default = default.unwrap_or_else(|| Local::now().naive_local());

    let date = field(fields, prefix, "date").map_or(default.date(), |raw| {
        NaiveDate::parse_from_str(raw, DATE_FORMAT).unwrap_or_else(|error| {
            tracing::warn!(field = %format!("{prefix}date"), raw, %error, "Ignoring malformed date");
            default.date()
        })
    });

    let time = field(fields, prefix, "time").map_or(default.time(), |raw| {
        NaiveTime::parse_from_str(raw, TIME_FORMAT).unwrap_or_else(|error| {
            tracing::warn!(field = %format!("{prefix}time"), raw, %error, "Ignoring malformed time");
            default.time()
        })
    });

    date.and_time(time)
}
