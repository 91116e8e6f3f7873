//! Period extraction.
//!
//! Splits one channel of a record into fixed-length, aligned periods such as
//! calendar days (24 samples) or weeks (168 samples), with excluded samples
//! kept as gaps.

mod extract;
mod kind;

pub use extract::{extract_periods, Periods};
pub use kind::{extract_calendar_periods, DayFilter, PeriodKind};
