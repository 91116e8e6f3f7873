//! Slices of a record for interval charts.

use crate::core::{BuildingRecord, Channel, SampleRange};
use crate::error::{ProfileError, Result};
use crate::solar::{daylight, Coordinates};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Every channel of a record over an inclusive sample range.
///
/// `usage` holds raw values, imputed samples included, with `usage_valid`
/// marking which ones were measured.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntervalWindow {
    pub range: SampleRange,
    pub times: Vec<DateTime<Utc>>,
    pub usage: Vec<f64>,
    pub usage_valid: Vec<bool>,
    /// Absent when the record has no temperature channel.
    pub temperature: Option<Vec<f64>>,
    /// Sun intensity clamped at zero; absent without a resolved location.
    pub sun: Option<Vec<f64>>,
}

impl IntervalWindow {
    pub fn new(
        record: &BuildingRecord,
        range: SampleRange,
        coords: Option<&Coordinates>,
    ) -> Result<Self> {
        if range.end >= record.len() {
            return Err(ProfileError::InvalidInput(format!(
                "range ends at {} but the record has {} samples",
                range.end,
                record.len()
            )));
        }
        let span = range.start..=range.end;

        let usage = record.channel(Channel::Usage)?;
        let temperature = record
            .channel(Channel::Temperature)
            .ok()
            .map(|data| data.values()[span.clone()].to_vec());
        let times = record.timestamps()[span.clone()].to_vec();
        let sun = coords.map(|c| times.iter().map(|t| daylight(c, t)).collect());

        Ok(Self {
            range,
            usage: usage.values()[span.clone()].to_vec(),
            usage_valid: usage.validity()[span].to_vec(),
            temperature,
            sun,
            times,
        })
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }
}
