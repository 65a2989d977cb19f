//! Locale-aware date, time and duration formatting plus the calendar helpers
//! used by the scheduling views.

pub mod calendar;
pub mod context;
pub mod convert;
pub mod error;
pub mod format;
pub mod human;
pub mod moment;
pub mod parse;
pub mod pretty;
pub mod units;

pub use context::{FormatContext, TimeConfig};
pub use error::{DateTimeError, DateTimeResult};
pub use format::{DisplayZone, Format};
pub use human::Granularity;
pub use moment::Moment;
pub use units::UnitStyle;
