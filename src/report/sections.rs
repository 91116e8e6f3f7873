//! Individual report sections.
//!
//! Each function computes one chart's data and fails on its own; the
//! assembly in the parent module decides what to do with a failure.

use super::window::IntervalWindow;
use crate::config::ReportConfig;
use crate::core::{BuildingRecord, Channel, SampleRange};
use crate::detection::{
    degenerate_periods, extreme_totals, highest_values, largest_changes, rank_periods_scored,
    ranked_ranges, spectrum, threshold_crossings, ChangeDirection, Degeneracy, Spectrum,
};
use crate::error::{ProfileError, Result};
use crate::periods::{extract_calendar_periods, DayFilter, PeriodKind, Periods};
use crate::solar::{sun_intensity, Coordinates};
use crate::utils::stats::{
    histogram, histogram2d, mean, min_max, percentile, Histogram, Histogram2d,
};
use chrono::{DateTime, Datelike, Timelike, Utc, Weekday};
use serde::Serialize;
use std::collections::BTreeMap;

/// Static facts and headline usage numbers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub id: String,
    pub naics: Option<String>,
    /// Industry description of `naics`, if the code is in the settings table.
    pub naics_description: Option<String>,
    pub building_type: Option<String>,
    pub samples: usize,
    pub valid_samples: usize,
    /// Mean hourly usage in kWh.
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub total_kwh: f64,
    pub total_mwh: f64,
}

/// A channel split into measured and imputed points.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoints {
    pub valid: Vec<(DateTime<Utc>, f64)>,
    pub imputed: Vec<(DateTime<Utc>, f64)>,
}

/// Reference lines drawn over the usage series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PercentileBand {
    pub low_percent: f64,
    pub low: f64,
    pub high_percent: f64,
    pub high: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MonthlyTotal {
    /// First sample of the month.
    pub start: DateTime<Utc>,
    pub total: f64,
}

/// Average and population standard deviation per offset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Profile {
    pub periods: usize,
    pub average: Vec<Option<f64>>,
    pub std: Vec<Option<f64>>,
}

impl Profile {
    fn from_periods(periods: &Periods) -> Result<Self> {
        if periods.is_empty() {
            return Err(ProfileError::InsufficientData {
                needed: periods.period_length(),
                got: 0,
            });
        }
        Ok(Self {
            periods: periods.len(),
            average: periods.average_profile(),
            std: periods.std_profile(),
        })
    }
}

/// Average day over all days and split by weekday and weekend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayProfiles {
    pub all: Profile,
    pub weekdays: Option<Profile>,
    pub weekends: Option<Profile>,
}

/// A ranked period with its chart data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedWindow {
    pub period: usize,
    pub score: f64,
    pub window: IntervalWindow,
}

/// A period that could not be scored, with its chart data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlaggedWindow {
    pub period: usize,
    pub reason: Degeneracy,
    pub window: IntervalWindow,
}

/// Most atypical periods, plus the periods left out of the ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrangePeriods {
    pub ranked: Vec<RankedWindow>,
    /// Outage-like periods (flat or fully imputed) in period order.
    pub flagged: Vec<FlaggedWindow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtremeDay {
    pub period: usize,
    pub total: f64,
    pub window: IntervalWindow,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtremeDays {
    pub highest: ExtremeDay,
    pub lowest: ExtremeDay,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrossingWindow {
    pub enter: usize,
    pub exit: usize,
    pub window: IntervalWindow,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrossingReport {
    pub threshold_percent: f64,
    pub threshold: f64,
    /// Crossings found before truncation.
    pub total: usize,
    pub crossings: Vec<CrossingWindow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Spike {
    /// Sample just before the increase.
    pub index: usize,
    pub time: DateTime<Utc>,
    pub change: f64,
    pub window: IntervalWindow,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Peak {
    pub index: usize,
    pub time: DateTime<Utc>,
    pub value: f64,
    pub window: IntervalWindow,
}

fn valid_usage(record: &BuildingRecord) -> Result<Vec<f64>> {
    let values = record.channel(Channel::Usage)?.valid_values();
    if values.is_empty() {
        return Err(ProfileError::InsufficientData { needed: 1, got: 0 });
    }
    Ok(values)
}

/// Headline numbers; `naics_table` maps industry codes to descriptions.
pub fn summary(record: &BuildingRecord, naics_table: &BTreeMap<String, String>) -> Result<Summary> {
    let usage = record.channel(Channel::Usage)?;
    let values = usage.values();
    let (min, max) = min_max(values).ok_or_else(|| {
        ProfileError::DegenerateComputation("usage has no finite values".to_string())
    })?;
    let total: f64 = values.iter().filter(|v| v.is_finite()).sum();

    Ok(Summary {
        id: record.id().to_string(),
        naics: record.naics().map(str::to_string),
        naics_description: record
            .naics()
            .and_then(|code| naics_table.get(code.trim()))
            .map(|description| description.trim().to_string()),
        building_type: record.building_type().map(str::to_string),
        samples: record.len(),
        valid_samples: usage.valid_count(),
        mean: mean(values),
        min,
        max,
        total_kwh: total,
        total_mwh: total / 1000.0,
    })
}

pub fn series(record: &BuildingRecord, channel: Channel) -> Result<SeriesPoints> {
    let data = record.channel(channel)?;
    let mut points = SeriesPoints {
        valid: Vec::with_capacity(data.valid_count()),
        imputed: Vec::new(),
    };
    for ((&t, &value), &valid) in record
        .timestamps()
        .iter()
        .zip(data.values())
        .zip(data.validity())
    {
        if valid {
            points.valid.push((t, value));
        } else {
            points.imputed.push((t, value));
        }
    }
    Ok(points)
}

pub fn usage_percentiles(record: &BuildingRecord, config: &ReportConfig) -> Result<PercentileBand> {
    let values = valid_usage(record)?;
    Ok(PercentileBand {
        low_percent: config.low_percentile,
        low: percentile(&values, config.low_percentile),
        high_percent: config.high_percentile,
        high: percentile(&values, config.high_percentile),
    })
}

pub fn usage_histogram(record: &BuildingRecord, config: &ReportConfig) -> Result<Histogram> {
    histogram(&valid_usage(record)?, config.histogram_bins).ok_or_else(|| {
        ProfileError::DegenerateComputation("usage has no finite valid values".to_string())
    })
}

/// Usage totals per local calendar month, imputed samples counted as zero.
///
/// A month starts at the first sample at local midnight of day 1; samples
/// before the first such start are not attributed to any month.
pub fn monthly_usage(record: &BuildingRecord) -> Result<Vec<MonthlyTotal>> {
    let usage = record.channel(Channel::Usage)?;
    let breaks: Vec<usize> = record
        .local_times()
        .enumerate()
        .filter(|(_, t)| t.day() == 1 && t.hour() == 0)
        .map(|(i, _)| i)
        .collect();
    if breaks.is_empty() {
        return Err(ProfileError::InsufficientData {
            needed: 1,
            got: 0,
        });
    }

    let zeroed: Vec<f64> = usage
        .values()
        .iter()
        .zip(usage.validity())
        .map(|(&v, &valid)| if valid { v } else { 0.0 })
        .collect();

    let ends = breaks.iter().skip(1).copied().chain([record.len()]);
    Ok(breaks
        .iter()
        .zip(ends)
        .map(|(&start, end)| MonthlyTotal {
            start: record.timestamps()[start],
            total: zeroed[start..end].iter().sum(),
        })
        .collect())
}

pub fn average_day(record: &BuildingRecord) -> Result<DayProfiles> {
    let profile = |filter| {
        extract_calendar_periods(record, Channel::Usage, PeriodKind::Day, filter, false)
            .and_then(|periods| Profile::from_periods(&periods))
    };

    let all = profile(DayFilter::All)?;
    let split = |filter| match profile(filter) {
        Ok(p) => Some(p),
        Err(error) => {
            tracing::debug!(record = record.id(), ?filter, %error, "no average day");
            None
        }
    };

    Ok(DayProfiles {
        all,
        weekdays: split(DayFilter::Weekdays),
        weekends: split(DayFilter::Weekends),
    })
}

/// Average week starting on Sunday.
pub fn average_week(record: &BuildingRecord) -> Result<Profile> {
    let periods = extract_calendar_periods(
        record,
        Channel::Usage,
        PeriodKind::Week(Weekday::Sun),
        DayFilter::All,
        false,
    )?;
    Profile::from_periods(&periods)
}

pub fn usage_spectrum(record: &BuildingRecord) -> Result<Spectrum> {
    spectrum(record.channel(Channel::Usage)?.values())
}

/// Temperature (x) against usage (y) over samples valid in both channels.
pub fn temperature_vs_usage(record: &BuildingRecord, config: &ReportConfig) -> Result<Histogram2d> {
    let usage = record.channel(Channel::Usage)?;
    let temps = record.channel(Channel::Temperature)?;

    let (xs, ys): (Vec<f64>, Vec<f64>) = (0..record.len())
        .filter(|&i| usage.is_valid(i) && temps.is_valid(i))
        .map(|i| (temps.values()[i], usage.values()[i]))
        .unzip();

    histogram2d(&xs, &ys, config.histogram_bins).ok_or_else(|| {
        ProfileError::DegenerateComputation(
            "no sample is valid in both temperature and usage".to_string(),
        )
    })
}

/// Sun intensity (x) against valid usage (y).
pub fn sun_vs_usage(
    record: &BuildingRecord,
    coords: &Coordinates,
    config: &ReportConfig,
) -> Result<Histogram2d> {
    let usage = record.channel(Channel::Usage)?;

    let (xs, ys): (Vec<f64>, Vec<f64>) = record
        .timestamps()
        .iter()
        .zip(usage.values())
        .zip(usage.validity())
        .filter(|&(_, &valid)| valid)
        .map(|((t, &v), _)| (sun_intensity(coords, t), v))
        .unzip();

    histogram2d(&xs, &ys, config.histogram_bins).ok_or_else(|| {
        ProfileError::DegenerateComputation("usage has no finite valid values".to_string())
    })
}

/// The most atypical periods of `kind`, with their chart data.
///
/// Periods without a score are not ranked; they are listed in `flagged`
/// with the reason instead.
pub fn strange_periods(
    record: &BuildingRecord,
    kind: PeriodKind,
    count: usize,
    standardize: bool,
    coords: Option<&Coordinates>,
) -> Result<StrangePeriods> {
    let periods =
        extract_calendar_periods(record, Channel::Usage, kind, DayFilter::All, false)?;
    let ranked: Vec<_> = rank_periods_scored(&periods, periods.len(), false, standardize)?
        .into_iter()
        .filter(|r| r.score.is_finite())
        .take(count)
        .collect();
    let flagged = degenerate_periods(&periods, standardize);
    if !flagged.is_empty() {
        tracing::debug!(
            record = record.id(),
            ?kind,
            flagged = flagged.len(),
            "periods left out of the ranking"
        );
    }

    let indices: Vec<usize> = ranked.iter().map(|r| r.index).collect();
    let ranges = ranked_ranges(record, &periods, &indices, 0)?;
    let ranked = ranked
        .iter()
        .zip(ranges)
        .map(|(r, range)| {
            Ok(RankedWindow {
                period: r.index,
                score: r.score,
                window: IntervalWindow::new(record, range, coords)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let indices: Vec<usize> = flagged.iter().map(|f| f.index).collect();
    let ranges = ranked_ranges(record, &periods, &indices, 0)?;
    let flagged = flagged
        .iter()
        .zip(ranges)
        .map(|(f, range)| {
            Ok(FlaggedWindow {
                period: f.index,
                reason: f.reason,
                window: IntervalWindow::new(record, range, coords)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(StrangePeriods { ranked, flagged })
}

pub fn extreme_days(
    record: &BuildingRecord,
    coords: Option<&Coordinates>,
) -> Result<ExtremeDays> {
    let periods = extract_calendar_periods(
        record,
        Channel::Usage,
        PeriodKind::Day,
        DayFilter::All,
        false,
    )?;
    let extremes = extreme_totals(&periods)?;

    let day = |period: usize, total: f64| -> Result<ExtremeDay> {
        let range = periods.sample_range(record, period)?;
        Ok(ExtremeDay {
            period,
            total,
            window: IntervalWindow::new(record, range, coords)?,
        })
    };

    Ok(ExtremeDays {
        highest: day(extremes.highest, extremes.highest_total)?,
        lowest: day(extremes.lowest, extremes.lowest_total)?,
    })
}

/// Excursions of raw usage above a percentile of valid usage.
pub fn crossings(
    record: &BuildingRecord,
    config: &ReportConfig,
    coords: Option<&Coordinates>,
) -> Result<CrossingReport> {
    let threshold = percentile(&valid_usage(record)?, config.threshold_percentile);
    let found = threshold_crossings(record.channel(Channel::Usage)?.values(), threshold)?;

    let total = found.len();
    let crossings = found
        .into_iter()
        .take(config.max_crossings)
        .map(|c| {
            Ok(CrossingWindow {
                enter: c.enter,
                exit: c.exit,
                window: IntervalWindow::new(record, c.window, coords)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CrossingReport {
        threshold_percent: config.threshold_percentile,
        threshold,
        total,
        crossings,
    })
}

/// The largest increases of raw usage with surrounding context.
pub fn spikes(
    record: &BuildingRecord,
    config: &ReportConfig,
    coords: Option<&Coordinates>,
) -> Result<Vec<Spike>> {
    let values = record.channel(Channel::Usage)?.values();
    let indices = largest_changes(values, config.spikes, ChangeDirection::Increase)?;

    indices
        .into_iter()
        .map(|index| {
            let range = SampleRange::point(index).widen(config.context_margin, record.len());
            Ok(Spike {
                index,
                time: record.timestamps()[index],
                change: values[index + 1] - values[index],
                window: IntervalWindow::new(record, range, coords)?,
            })
        })
        .collect()
}

/// The highest raw usage samples with surrounding context.
pub fn peaks(
    record: &BuildingRecord,
    config: &ReportConfig,
    coords: Option<&Coordinates>,
) -> Result<Vec<Peak>> {
    let values = record.channel(Channel::Usage)?.values();

    highest_values(values, config.peaks)?
        .into_iter()
        .map(|index| {
            let range = SampleRange::point(index).widen(config.context_margin, record.len());
            Ok(Peak {
                index,
                time: record.timestamps()[index],
                value: values[index],
                window: IntervalWindow::new(record, range, coords)?,
            })
        })
        .collect()
}
