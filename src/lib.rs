//! # kwh-profile
//!
//! Profiling of building-level hourly energy usage.
//!
//! Splits a building's usage into calendar periods, ranks the periods that
//! deviate most from the average one, finds threshold crossings and sudden
//! changes, and assembles the data behind a full set of diagnostic charts.
//!
//! ```
//! use chrono::{Duration, TimeZone, Utc};
//! use kwh_profile::prelude::*;
//!
//! let start = Utc.with_ymd_and_hms(2011, 1, 3, 0, 0, 0).unwrap();
//! let times: Vec<_> = (0..48).map(|h| start + Duration::hours(h)).collect();
//! let mut usage = vec![1.0; 48];
//! usage[30] = 100.0;
//! let record = BuildingRecord::usage_only(times, ChannelData::all_valid(usage)).unwrap();
//!
//! let days = extract_calendar_periods(&record, Channel::Usage, PeriodKind::Day, DayFilter::All, false)
//!     .unwrap();
//! assert_eq!(rank_periods(&days, 1, false, true).unwrap(), vec![1]);
//! ```

#![allow(clippy::too_many_arguments)]
#![allow(clippy::type_complexity)]

pub mod config;
pub mod core;
pub mod detection;
pub mod error;
pub mod io;
pub mod periods;
pub mod report;
pub mod solar;
pub mod transform;
pub mod utils;

pub use error::{ProfileError, Result};

pub mod prelude {
    pub use crate::config::{ReportConfig, Settings};
    pub use crate::core::{BuildingRecord, Channel, ChannelData, RecordBuilder, SampleRange};
    pub use crate::detection::{
        extreme_totals, largest_changes, rank_periods, threshold_crossings, ChangeDirection,
        Crossing,
    };
    pub use crate::error::{ProfileError, Result};
    pub use crate::periods::{extract_calendar_periods, extract_periods, DayFilter, PeriodKind};
    pub use crate::report::Report;
    pub use crate::solar::{sun_intensity, Location, SiteCatalog};
}
