//! Partition a channel into fixed-length, aligned periods.

use crate::core::{BuildingRecord, Channel, SampleRange};
use crate::error::{ProfileError, Result};
use crate::utils::stats::{masked_mean, masked_sum, population_std};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;

/// Fixed-length periods of one channel.
///
/// `values[p][k]` is offset `k` of period `p`; excluded samples (imputed or
/// skipped) are `None`. `times` has the same shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Periods {
    period_length: usize,
    values: Vec<Vec<Option<f64>>>,
    times: Vec<Vec<DateTime<Utc>>>,
}

impl Periods {
    /// Build from already-shaped rows.
    pub fn new(
        period_length: usize,
        values: Vec<Vec<Option<f64>>>,
        times: Vec<Vec<DateTime<Utc>>>,
    ) -> Result<Self> {
        if period_length == 0 {
            return Err(ProfileError::InvalidInput(
                "period length must be positive".to_string(),
            ));
        }
        if values.len() != times.len() {
            return Err(ProfileError::DimensionMismatch {
                expected: values.len(),
                got: times.len(),
            });
        }
        for row in values.iter().map(Vec::len).chain(times.iter().map(Vec::len)) {
            if row != period_length {
                return Err(ProfileError::DimensionMismatch {
                    expected: period_length,
                    got: row,
                });
            }
        }
        Ok(Self {
            period_length,
            values,
            times,
        })
    }

    /// Number of periods.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn period_length(&self) -> usize {
        self.period_length
    }

    pub fn values(&self) -> &[Vec<Option<f64>>] {
        &self.values
    }

    pub fn times(&self) -> &[Vec<DateTime<Utc>>] {
        &self.times
    }

    pub fn period(&self, index: usize) -> Option<&[Option<f64>]> {
        self.values.get(index).map(Vec::as_slice)
    }

    pub fn period_times(&self, index: usize) -> Option<&[DateTime<Utc>]> {
        self.times.get(index).map(Vec::as_slice)
    }

    /// Number of samples that are not excluded.
    pub fn included_count(&self) -> usize {
        self.values.iter().flatten().filter(|v| v.is_some()).count()
    }

    /// Present values at one offset across all periods.
    pub fn column(&self, offset: usize) -> Vec<f64> {
        self.values
            .iter()
            .filter_map(|row| row.get(offset).copied().flatten())
            .collect()
    }

    /// Elementwise average across periods, ignoring excluded samples.
    pub fn average_profile(&self) -> Vec<Option<f64>> {
        (0..self.period_length)
            .map(|k| {
                let column: Vec<Option<f64>> = self.values.iter().map(|row| row[k]).collect();
                masked_mean(&column)
            })
            .collect()
    }

    /// Elementwise population standard deviation, ignoring excluded samples.
    pub fn std_profile(&self) -> Vec<Option<f64>> {
        (0..self.period_length)
            .map(|k| {
                let column = self.column(k);
                (!column.is_empty()).then(|| population_std(&column))
            })
            .collect()
    }

    /// Per-period sum of included samples; `None` for an all-excluded period.
    pub fn totals(&self) -> Vec<Option<f64>> {
        self.values.iter().map(|row| masked_sum(row)).collect()
    }

    /// Locate a period's first and last timestamp in `record`.
    pub fn sample_range(&self, record: &BuildingRecord, index: usize) -> Result<SampleRange> {
        let times = self
            .period_times(index)
            .ok_or_else(|| ProfileError::InvalidInput(format!("no period at index {index}")))?;

        let lookup = |t: &DateTime<Utc>| {
            record.index_of(t).ok_or_else(|| {
                ProfileError::TimestampError(format!("{t} is not a sample of the record"))
            })
        };
        let (first, last) = match (times.first(), times.last()) {
            (Some(first), Some(last)) => (lookup(first)?, lookup(last)?),
            _ => return Err(ProfileError::EmptyData),
        };

        if first > last {
            return Err(ProfileError::InvalidInput(format!(
                "period {index} wraps around the end of the record"
            )));
        }
        SampleRange::new(first, last)
    }
}

/// Partition `channel` of `record` into periods of `period_length` samples.
///
/// A sample is excluded when it is imputed or `skip` holds for its local
/// time. Periods begin at the first sample for which `is_period_start`
/// holds (index 0 if none does). With `wrap_around` the samples before that
/// start are appended to the end instead of being dropped. A trailing
/// remainder shorter than `period_length` is dropped.
///
/// # Arguments
/// * `record` - Building record to read from
/// * `channel` - Channel to partition
/// * `period_length` - Samples per period
/// * `is_period_start` - Holds for the local time of a sample that begins a period
/// * `skip` - Holds for the local time of a sample to exclude
/// * `wrap_around` - Append the samples before the first start instead of dropping them
///
/// # Returns
/// One row of values and one row of timestamps per period, excluded samples
/// as `None`. Fails if `period_length` is zero or the channel is missing.
pub fn extract_periods<P, S>(
    record: &BuildingRecord,
    channel: Channel,
    period_length: usize,
    is_period_start: P,
    skip: S,
    wrap_around: bool,
) -> Result<Periods>
where
    P: Fn(&DateTime<Tz>) -> bool,
    S: Fn(&DateTime<Tz>) -> bool,
{
    if period_length == 0 {
        return Err(ProfileError::InvalidInput(
            "period length must be positive".to_string(),
        ));
    }

    let data = record.channel(channel)?;
    if data.len() != record.len() {
        return Err(ProfileError::DimensionMismatch {
            expected: record.len(),
            got: data.len(),
        });
    }

    let local: Vec<DateTime<Tz>> = record.local_times().collect();
    let masked: Vec<Option<f64>> = data
        .values()
        .iter()
        .zip(data.validity())
        .zip(&local)
        .map(|((&value, &valid), t)| (valid && !skip(t)).then_some(value))
        .collect();

    let first = match local.iter().position(|t| is_period_start(t)) {
        Some(index) => index,
        None => {
            tracing::debug!(
                record = record.id(),
                %channel,
                "no period start found, periods begin at the first sample"
            );
            0
        }
    };

    let order: Vec<usize> = if wrap_around {
        (first..record.len()).chain(0..first).collect()
    } else {
        (first..record.len()).collect()
    };

    let timestamps = record.timestamps();
    let (values, times): (Vec<_>, Vec<_>) = order
        .chunks_exact(period_length)
        .map(|chunk| {
            let values: Vec<Option<f64>> = chunk.iter().map(|&i| masked[i]).collect();
            let times: Vec<DateTime<Utc>> = chunk.iter().map(|&i| timestamps[i]).collect();
            (values, times)
        })
        .unzip();

    tracing::debug!(
        record = record.id(),
        %channel,
        period_length,
        periods = values.len(),
        dropped = order.len() % period_length,
        "extracted periods"
    );

    Ok(Periods {
        period_length,
        values,
        times,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ChannelData, RecordBuilder};
    use chrono::{Datelike, Duration, TimeZone, Timelike, Weekday};

    fn hourly_record(start_hour: u32, values: Vec<f64>, valid: Vec<bool>) -> BuildingRecord {
        let base = Utc.with_ymd_and_hms(2011, 1, 3, start_hour, 0, 0).unwrap();
        let timestamps = (0..values.len())
            .map(|i| base + Duration::hours(i as i64))
            .collect();
        RecordBuilder::new()
            .id("test")
            .timestamps(timestamps)
            .channel(Channel::Usage, ChannelData::new(values, valid).unwrap())
            .build()
            .unwrap()
    }

    fn is_midnight(t: &DateTime<Tz>) -> bool {
        t.hour() == 0
    }

    fn never(_: &DateTime<Tz>) -> bool {
        false
    }

    #[test]
    fn extracts_aligned_days_and_drops_remainder() {
        // Starts at 20:00, so the first four samples precede midnight.
        let n = 4 + 48 + 5;
        let values: Vec<f64> = (0..n).map(|i| i as f64).collect();
        let record = hourly_record(20, values, vec![true; n]);

        let periods = extract_periods(&record, Channel::Usage, 24, is_midnight, never, false).unwrap();

        assert_eq!(periods.len(), 2);
        assert_eq!(periods.period(0).unwrap()[0], Some(4.0));
        assert_eq!(periods.period(1).unwrap()[23], Some(51.0));
        assert_eq!(periods.period_times(0).unwrap()[0].hour(), 0);
    }

    #[test]
    fn wrap_around_moves_prefix_to_the_end() {
        let n = 4 + 20;
        let values: Vec<f64> = (0..n).map(|i| i as f64).collect();
        let record = hourly_record(20, values, vec![true; n]);

        let periods = extract_periods(&record, Channel::Usage, 24, is_midnight, never, true).unwrap();

        assert_eq!(periods.len(), 1);
        let row = periods.period(0).unwrap();
        assert_eq!(row[0], Some(4.0));
        assert_eq!(row[19], Some(23.0));
        assert_eq!(row[20], Some(0.0));
        assert_eq!(row[23], Some(3.0));
    }

    #[test]
    fn excluded_samples_are_masked() {
        let n = 24;
        let mut valid = vec![true; n];
        valid[3] = false;
        let record = hourly_record(0, vec![1.0; n], valid);

        let skip_evening = |t: &DateTime<Tz>| t.hour() >= 22;
        let periods =
            extract_periods(&record, Channel::Usage, 24, is_midnight, skip_evening, false).unwrap();

        let row = periods.period(0).unwrap();
        assert_eq!(row[3], None);
        assert_eq!(row[22], None);
        assert_eq!(row[23], None);
        assert_eq!(row[4], Some(1.0));
        assert_eq!(periods.included_count(), 21);
    }

    #[test]
    fn missing_start_falls_back_to_first_sample() {
        let record = hourly_record(1, (0..10).map(f64::from).collect(), vec![true; 10]);

        let periods =
            extract_periods(&record, Channel::Usage, 5, |_: &DateTime<Tz>| false, never, false)
                .unwrap();

        assert_eq!(periods.len(), 2);
        assert_eq!(periods.period(0).unwrap()[0], Some(0.0));
    }

    #[test]
    fn rejects_invalid_arguments() {
        let record = hourly_record(0, vec![1.0; 24], vec![true; 24]);

        let result = extract_periods(&record, Channel::Usage, 0, is_midnight, never, false);
        assert!(matches!(result, Err(ProfileError::InvalidInput(_))));

        let result = extract_periods(&record, Channel::Temperature, 24, is_midnight, never, false);
        assert!(matches!(
            result,
            Err(ProfileError::MissingChannel(Channel::Temperature))
        ));
    }

    #[test]
    fn weekly_periods_start_on_requested_weekday() {
        // 2011-01-03 is a Monday; 21 days of data.
        let n = 21 * 24;
        let record = hourly_record(0, vec![1.0; n], vec![true; n]);
        let is_sunday = |t: &DateTime<Tz>| t.weekday() == Weekday::Sun && t.hour() == 0;

        let periods = extract_periods(&record, Channel::Usage, 168, is_sunday, never, false).unwrap();

        assert_eq!(periods.len(), 2);
        assert_eq!(periods.period_times(0).unwrap()[0].weekday(), Weekday::Sun);
    }

    #[test]
    fn profiles_ignore_excluded_samples() {
        let values = vec![1.0, 2.0, 3.0, 5.0, 100.0, 7.0];
        let valid = vec![true, true, true, true, false, true];
        let record = hourly_record(0, values, valid);

        let periods = extract_periods(&record, Channel::Usage, 3, |_: &DateTime<Tz>| true, never, false)
            .unwrap();

        assert_eq!(periods.average_profile(), vec![Some(3.0), Some(2.0), Some(5.0)]);
        assert_eq!(periods.std_profile()[0], Some(2.0));
        assert_eq!(periods.std_profile()[1], Some(0.0));
        assert_eq!(periods.totals(), vec![Some(6.0), Some(12.0)]);
    }

    #[test]
    fn sample_range_locates_period_in_record() {
        let n = 4 + 48;
        let record = hourly_record(20, vec![1.0; n], vec![true; n]);
        let periods = extract_periods(&record, Channel::Usage, 24, is_midnight, never, false).unwrap();

        assert_eq!(
            periods.sample_range(&record, 1).unwrap(),
            SampleRange { start: 28, end: 51 }
        );
        assert!(periods.sample_range(&record, 2).is_err());
    }

    #[test]
    fn sample_range_rejects_wrapped_period() {
        let n = 4 + 20;
        let record = hourly_record(20, vec![1.0; n], vec![true; n]);
        let periods = extract_periods(&record, Channel::Usage, 24, is_midnight, never, true).unwrap();

        assert!(matches!(
            periods.sample_range(&record, 0),
            Err(ProfileError::InvalidInput(_))
        ));
    }

    #[test]
    fn periods_new_validates_shape() {
        let t = Utc.with_ymd_and_hms(2011, 1, 1, 0, 0, 0).unwrap();
        assert!(Periods::new(2, vec![vec![Some(1.0), None]], vec![vec![t, t]]).is_ok());
        assert!(Periods::new(2, vec![vec![Some(1.0)]], vec![vec![t]]).is_err());
        assert!(Periods::new(0, vec![], vec![]).is_err());
    }
}
