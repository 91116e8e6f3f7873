//! Building record: timestamps plus typed channels with validity masks.

use crate::error::{ProfileError, Result};
use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Observed quantity carried by a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Channel {
    /// Hourly electricity usage in kWh.
    #[serde(rename = "kwhs")]
    Usage,
    /// Outdoor temperature.
    #[serde(rename = "temps")]
    Temperature,
}

impl Channel {
    /// Key used for this channel in dataset files.
    pub fn key(&self) -> &'static str {
        match self {
            Channel::Usage => "kwhs",
            Channel::Temperature => "temps",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Values of one channel with the per-sample validity mask.
///
/// `valid[i] == false` marks an imputed (synthetic) value.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelData {
    values: Vec<f64>,
    valid: Vec<bool>,
}

impl ChannelData {
    pub fn new(values: Vec<f64>, valid: Vec<bool>) -> Result<Self> {
        if values.len() != valid.len() {
            return Err(ProfileError::DimensionMismatch {
                expected: values.len(),
                got: valid.len(),
            });
        }
        Ok(Self { values, valid })
    }

    /// Channel where every sample is an original observation.
    pub fn all_valid(values: Vec<f64>) -> Self {
        let valid = vec![true; values.len()];
        Self { values, valid }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn validity(&self) -> &[bool] {
        &self.valid
    }

    pub fn is_valid(&self, index: usize) -> bool {
        self.valid.get(index).copied().unwrap_or(false)
    }

    /// Original observations only, in sample order.
    pub fn valid_values(&self) -> Vec<f64> {
        self.values
            .iter()
            .zip(&self.valid)
            .filter(|(_, &ok)| ok)
            .map(|(&v, _)| v)
            .collect()
    }

    pub fn valid_count(&self) -> usize {
        self.valid.iter().filter(|&&ok| ok).count()
    }

    /// Values with imputed samples replaced by `None`.
    pub fn masked(&self) -> Vec<Option<f64>> {
        self.values
            .iter()
            .zip(&self.valid)
            .map(|(&v, &ok)| ok.then_some(v))
            .collect()
    }
}

/// Builder for constructing a [`BuildingRecord`].
#[derive(Debug, Clone)]
pub struct RecordBuilder {
    id: String,
    naics: Option<String>,
    building_type: Option<String>,
    timezone: Tz,
    timestamps: Vec<DateTime<Utc>>,
    channels: BTreeMap<Channel, ChannelData>,
}

impl Default for RecordBuilder {
    fn default() -> Self {
        Self {
            id: String::new(),
            naics: None,
            building_type: None,
            timezone: Tz::UTC,
            timestamps: Vec::new(),
            channels: BTreeMap::new(),
        }
    }
}

impl RecordBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn naics(mut self, naics: impl Into<String>) -> Self {
        self.naics = Some(naics.into());
        self
    }

    pub fn building_type(mut self, building_type: impl Into<String>) -> Self {
        self.building_type = Some(building_type.into());
        self
    }

    /// Time zone in which period predicates see the timestamps.
    pub fn timezone(mut self, tz: Tz) -> Self {
        self.timezone = tz;
        self
    }

    pub fn timestamps(mut self, timestamps: Vec<DateTime<Utc>>) -> Self {
        self.timestamps = timestamps;
        self
    }

    pub fn channel(mut self, channel: Channel, data: ChannelData) -> Self {
        self.channels.insert(channel, data);
        self
    }

    pub fn build(self) -> Result<BuildingRecord> {
        BuildingRecord::new(
            self.id,
            self.naics,
            self.building_type,
            self.timezone,
            self.timestamps,
            self.channels,
        )
    }
}

/// One building's time series record.
///
/// All channels share the length and index alignment of `timestamps`, which
/// are strictly increasing. A record is never mutated after construction.
#[derive(Debug, Clone)]
pub struct BuildingRecord {
    id: String,
    naics: Option<String>,
    building_type: Option<String>,
    timezone: Tz,
    timestamps: Vec<DateTime<Utc>>,
    channels: BTreeMap<Channel, ChannelData>,
}

impl BuildingRecord {
    pub fn new(
        id: String,
        naics: Option<String>,
        building_type: Option<String>,
        timezone: Tz,
        timestamps: Vec<DateTime<Utc>>,
        channels: BTreeMap<Channel, ChannelData>,
    ) -> Result<Self> {
        if timestamps.is_empty() {
            return Err(ProfileError::EmptyData);
        }

        if timestamps.windows(2).any(|w| w[1] <= w[0]) {
            return Err(ProfileError::TimestampError(
                "timestamps must be strictly increasing".to_string(),
            ));
        }

        for data in channels.values() {
            if data.len() != timestamps.len() {
                return Err(ProfileError::DimensionMismatch {
                    expected: timestamps.len(),
                    got: data.len(),
                });
            }
        }

        Ok(Self {
            id,
            naics,
            building_type,
            timezone,
            timestamps,
            channels,
        })
    }

    /// Record with only a usage channel, evaluated in UTC.
    pub fn usage_only(timestamps: Vec<DateTime<Utc>>, usage: ChannelData) -> Result<Self> {
        RecordBuilder::new()
            .timestamps(timestamps)
            .channel(Channel::Usage, usage)
            .build()
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn naics(&self) -> Option<&str> {
        self.naics.as_deref()
    }

    pub fn building_type(&self) -> Option<&str> {
        self.building_type.as_deref()
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn timestamps(&self) -> &[DateTime<Utc>] {
        &self.timestamps
    }

    /// Wall-clock time of every sample in the record's time zone.
    pub fn local_times(&self) -> impl Iterator<Item = DateTime<Tz>> + '_ {
        let tz = self.timezone;
        self.timestamps.iter().map(move |t| t.with_timezone(&tz))
    }

    pub fn has_channel(&self, channel: Channel) -> bool {
        self.channels.contains_key(&channel)
    }

    pub fn channel(&self, channel: Channel) -> Result<&ChannelData> {
        self.channels
            .get(&channel)
            .ok_or(ProfileError::MissingChannel(channel))
    }

    /// Index of the sample taken at `timestamp`, if any.
    pub fn index_of(&self, timestamp: &DateTime<Utc>) -> Option<usize> {
        self.timestamps.binary_search(timestamp).ok()
    }

    /// Infer the sampling interval as the modal spacing between timestamps.
    pub fn infer_frequency(&self, tolerance: f64) -> Result<Duration> {
        if self.len() < 2 {
            return Err(ProfileError::InsufficientData {
                needed: 2,
                got: self.len(),
            });
        }

        let mut counts: HashMap<i64, usize> = HashMap::new();
        for w in self.timestamps.windows(2) {
            *counts.entry((w[1] - w[0]).num_seconds()).or_insert(0) += 1;
        }

        let (modal_diff, modal_count) = counts
            .iter()
            .max_by_key(|(&diff, &count)| (count, std::cmp::Reverse(diff)))
            .map(|(&diff, &count)| (diff, count))
            .ok_or_else(|| ProfileError::TimestampError("empty spacing data".to_string()))?;

        let total: usize = counts.values().sum();
        if (modal_count as f64 / total as f64) < tolerance {
            return Err(ProfileError::TimestampError(
                "no unique modal spacing found".to_string(),
            ));
        }

        Ok(Duration::seconds(modal_diff))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};

    fn make_timestamps(n: usize) -> Vec<DateTime<Utc>> {
        let base = Utc.with_ymd_and_hms(2011, 1, 1, 0, 0, 0).unwrap();
        (0..n).map(|i| base + Duration::hours(i as i64)).collect()
    }

    #[test]
    fn record_constructs_with_channels() {
        let record = RecordBuilder::new()
            .id("22891")
            .naics("611110")
            .building_type("School")
            .timestamps(make_timestamps(3))
            .channel(Channel::Usage, ChannelData::all_valid(vec![1.0, 2.0, 3.0]))
            .channel(
                Channel::Temperature,
                ChannelData::new(vec![10.0, 11.0, 12.0], vec![true, false, true]).unwrap(),
            )
            .build()
            .unwrap();

        assert_eq!(record.len(), 3);
        assert_eq!(record.id(), "22891");
        assert_eq!(record.naics(), Some("611110"));
        assert!(record.has_channel(Channel::Temperature));
        let temps = record.channel(Channel::Temperature).unwrap();
        assert_eq!(temps.valid_values(), vec![10.0, 12.0]);
        assert_eq!(temps.valid_count(), 2);
        assert_eq!(temps.masked(), vec![Some(10.0), None, Some(12.0)]);
    }

    #[test]
    fn record_rejects_mismatched_channel_length() {
        let result = RecordBuilder::new()
            .timestamps(make_timestamps(3))
            .channel(Channel::Usage, ChannelData::all_valid(vec![1.0, 2.0]))
            .build();

        assert!(matches!(
            result,
            Err(ProfileError::DimensionMismatch {
                expected: 3,
                got: 2
            })
        ));
    }

    #[test]
    fn channel_rejects_mismatched_mask() {
        let result = ChannelData::new(vec![1.0, 2.0], vec![true]);
        assert!(matches!(result, Err(ProfileError::DimensionMismatch { .. })));
    }

    #[test]
    fn record_rejects_empty_and_unordered_timestamps() {
        let result = RecordBuilder::new().build();
        assert!(matches!(result, Err(ProfileError::EmptyData)));

        let mut timestamps = make_timestamps(3);
        timestamps.swap(1, 2);
        let result = BuildingRecord::usage_only(timestamps, ChannelData::all_valid(vec![0.0; 3]));
        assert!(matches!(result, Err(ProfileError::TimestampError(_))));

        let mut timestamps = make_timestamps(3);
        timestamps[2] = timestamps[1];
        let result = BuildingRecord::usage_only(timestamps, ChannelData::all_valid(vec![0.0; 3]));
        assert!(matches!(result, Err(ProfileError::TimestampError(_))));
    }

    #[test]
    fn missing_channel_is_reported() {
        let record =
            BuildingRecord::usage_only(make_timestamps(2), ChannelData::all_valid(vec![1.0, 2.0]))
                .unwrap();
        assert!(matches!(
            record.channel(Channel::Temperature),
            Err(ProfileError::MissingChannel(Channel::Temperature))
        ));
    }

    #[test]
    fn local_times_follow_record_timezone() {
        let record = RecordBuilder::new()
            .timezone(chrono_tz::US::Central)
            .timestamps(make_timestamps(7))
            .channel(Channel::Usage, ChannelData::all_valid(vec![0.0; 7]))
            .build()
            .unwrap();

        // 2011-01-01 06:00 UTC is midnight in US/Central (CST, UTC-6)
        let local: Vec<_> = record.local_times().collect();
        assert_eq!(local[6].hour(), 0);
        assert_eq!(local[0].hour(), 18);
    }

    #[test]
    fn index_of_finds_exact_timestamps() {
        let timestamps = make_timestamps(5);
        let record =
            BuildingRecord::usage_only(timestamps.clone(), ChannelData::all_valid(vec![0.0; 5]))
                .unwrap();

        assert_eq!(record.index_of(&timestamps[3]), Some(3));
        let between = timestamps[1] + Duration::minutes(30);
        assert_eq!(record.index_of(&between), None);
    }

    #[test]
    fn infers_hourly_frequency_with_gaps() {
        let mut timestamps = make_timestamps(10);
        timestamps.remove(4);
        let record =
            BuildingRecord::usage_only(timestamps, ChannelData::all_valid(vec![0.0; 9])).unwrap();

        assert_eq!(record.infer_frequency(0.5).unwrap(), Duration::hours(1));
    }

    #[test]
    fn frequency_inference_needs_two_samples() {
        let record =
            BuildingRecord::usage_only(make_timestamps(1), ChannelData::all_valid(vec![1.0]))
                .unwrap();
        assert!(matches!(
            record.infer_frequency(0.5),
            Err(ProfileError::InsufficientData { needed: 2, got: 1 })
        ));
    }

    #[test]
    fn channel_keys_match_dataset_names() {
        assert_eq!(Channel::Usage.key(), "kwhs");
        assert_eq!(Channel::Temperature.to_string(), "temps");
    }
}
