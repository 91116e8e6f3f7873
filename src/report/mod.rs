//! Chart data for a single building.
//!
//! [`Report::build`] runs every section independently. A section that fails
//! is logged at `warn` level and left as `None`; the rest of the report is
//! unaffected.
//!
//! # Example
//!
//! ```
//! use chrono::{Duration, TimeZone, Utc};
//! use kwh_profile::config::Settings;
//! use kwh_profile::core::{BuildingRecord, ChannelData};
//! use kwh_profile::report::Report;
//!
//! let start = Utc.with_ymd_and_hms(2011, 1, 3, 0, 0, 0).unwrap();
//! let times: Vec<_> = (0..24 * 14).map(|h| start + Duration::hours(h)).collect();
//! let usage: Vec<f64> = (0..24 * 14).map(|h| 10.0 + (h % 24) as f64).collect();
//! let record = BuildingRecord::usage_only(times, ChannelData::all_valid(usage)).unwrap();
//!
//! let report = Report::build(&record, &Settings::default());
//! assert!(report.summary.is_some());
//! // No temperature channel.
//! assert!(report.temperature_vs_usage.is_none());
//! ```

mod sections;
mod window;

pub use sections::{
    CrossingReport, CrossingWindow, DayProfiles, ExtremeDay, ExtremeDays, FlaggedWindow,
    MonthlyTotal, Peak, PercentileBand, Profile, RankedWindow, SeriesPoints, Spike,
    StrangePeriods, Summary,
};
pub use window::IntervalWindow;

use crate::config::Settings;
use crate::core::{BuildingRecord, Channel};
use crate::detection::Spectrum;
use crate::error::Result;
use crate::periods::PeriodKind;
use crate::utils::stats::{Histogram, Histogram2d};
use chrono::Weekday;
use serde::Serialize;

/// Every chart of one building as serializable data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub summary: Option<Summary>,
    pub usage_series: Option<SeriesPoints>,
    pub temperature_series: Option<SeriesPoints>,
    pub usage_percentiles: Option<PercentileBand>,
    pub usage_histogram: Option<Histogram>,
    pub monthly_usage: Option<Vec<MonthlyTotal>>,
    pub average_day: Option<DayProfiles>,
    pub average_week: Option<Profile>,
    pub spectrum: Option<Spectrum>,
    pub temperature_vs_usage: Option<Histogram2d>,
    pub sun_vs_usage: Option<Histogram2d>,
    pub strange_days: Option<StrangePeriods>,
    pub strange_weeks: Option<StrangePeriods>,
    pub extreme_days: Option<ExtremeDays>,
    pub threshold_crossings: Option<CrossingReport>,
    pub spikes: Option<Vec<Spike>>,
    pub peaks: Option<Vec<Peak>>,
}

fn section<T>(record: &BuildingRecord, name: &str, result: Result<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(error) => {
            tracing::warn!(record = record.id(), section = name, %error, "section skipped");
            None
        }
    }
}

impl Report {
    pub fn build(record: &BuildingRecord, settings: &Settings) -> Self {
        let config = &settings.report;
        let coords = section(
            record,
            "location",
            settings.sites.resolve(&settings.location),
        );
        let coords = coords.as_ref();

        tracing::debug!(
            record = record.id(),
            samples = record.len(),
            has_location = coords.is_some(),
            "building report"
        );

        Self {
            summary: section(
                record,
                "summary",
                sections::summary(record, &settings.naics),
            ),
            usage_series: section(
                record,
                "usage_series",
                sections::series(record, Channel::Usage),
            ),
            temperature_series: section(
                record,
                "temperature_series",
                sections::series(record, Channel::Temperature),
            ),
            usage_percentiles: section(
                record,
                "usage_percentiles",
                sections::usage_percentiles(record, config),
            ),
            usage_histogram: section(
                record,
                "usage_histogram",
                sections::usage_histogram(record, config),
            ),
            monthly_usage: section(record, "monthly_usage", sections::monthly_usage(record)),
            average_day: section(record, "average_day", sections::average_day(record)),
            average_week: section(record, "average_week", sections::average_week(record)),
            spectrum: section(record, "spectrum", sections::usage_spectrum(record)),
            temperature_vs_usage: section(
                record,
                "temperature_vs_usage",
                sections::temperature_vs_usage(record, config),
            ),
            sun_vs_usage: coords.and_then(|c| {
                section(
                    record,
                    "sun_vs_usage",
                    sections::sun_vs_usage(record, c, config),
                )
            }),
            strange_days: section(
                record,
                "strange_days",
                sections::strange_periods(
                    record,
                    PeriodKind::Day,
                    config.strange_days,
                    config.standardize,
                    coords,
                ),
            ),
            strange_weeks: section(
                record,
                "strange_weeks",
                sections::strange_periods(
                    record,
                    PeriodKind::Week(Weekday::Mon),
                    config.strange_weeks,
                    config.standardize,
                    coords,
                ),
            ),
            extreme_days: section(
                record,
                "extreme_days",
                sections::extreme_days(record, coords),
            ),
            threshold_crossings: section(
                record,
                "threshold_crossings",
                sections::crossings(record, config, coords),
            ),
            spikes: section(record, "spikes", sections::spikes(record, config, coords)),
            peaks: section(record, "peaks", sections::peaks(record, config, coords)),
        }
    }

    /// Names of the sections that could not be computed.
    pub fn missing_sections(&self) -> Vec<&'static str> {
        [
            ("summary", self.summary.is_none()),
            ("usage_series", self.usage_series.is_none()),
            ("temperature_series", self.temperature_series.is_none()),
            ("usage_percentiles", self.usage_percentiles.is_none()),
            ("usage_histogram", self.usage_histogram.is_none()),
            ("monthly_usage", self.monthly_usage.is_none()),
            ("average_day", self.average_day.is_none()),
            ("average_week", self.average_week.is_none()),
            ("spectrum", self.spectrum.is_none()),
            ("temperature_vs_usage", self.temperature_vs_usage.is_none()),
            ("sun_vs_usage", self.sun_vs_usage.is_none()),
            ("strange_days", self.strange_days.is_none()),
            ("strange_weeks", self.strange_weeks.is_none()),
            ("extreme_days", self.extreme_days.is_none()),
            ("threshold_crossings", self.threshold_crossings.is_none()),
            ("spikes", self.spikes.is_none()),
            ("peaks", self.peaks.is_none()),
        ]
        .into_iter()
        .filter_map(|(name, missing)| missing.then_some(name))
        .collect()
    }
}
