use thiserror::Error;

/// Date/time formatting and conversion errors
#[derive(Error, Debug)]
pub enum DateTimeError {
    /// The value carries a non-UTC offset where a naive or UTC value was expected.
    #[error("{0} already contains non-UTC timezone data")]
    InvalidTimezone(String),

    /// An explicit timezone was combined with a datetime that already has one.
    #[error("Datetime is not naive: {0}")]
    ConflictingTimezone(String),

    /// Wall-clock time skipped by a DST transition.
    #[error("Non-existent time (DST gap): {0}")]
    NonExistentTime(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid format pattern: {0}")]
    InvalidFormat(String),

    #[error("Invalid number: {0}")]
    InvalidNumber(String),

    #[error("Value out of range: {0}")]
    OutOfRange(String),

    /// Locale data could not be loaded for the requested formatter.
    #[error("Locale data error: {0}")]
    Icu(String),

    #[error("Recurrence error: {0}")]
    Recurrence(#[from] rrule::RRuleError),

    #[error(transparent)]
    Core(#[from] snms_core::error::CoreError),
}

pub type DateTimeResult<T> = std::result::Result<T, DateTimeError>;
