//! JSON building datasets.
//!
//! A dataset file holds one building:
//!
//! ```json
//! {
//!   "bid": "1042",
//!   "naics": "611110",
//!   "btype": "School",
//!   "timezone": "America/Chicago",
//!   "times": ["2011-01-01T06:00:00Z", "2011-01-01T07:00:00Z"],
//!   "kwhs": { "values": [12.5, 13.0], "valid": [true, false] },
//!   "temps": { "values": [-3.0, -2.5], "valid": [true, true] }
//! }
//! ```
//!
//! `temps` is optional, as is `valid` (all samples measured when absent).

use crate::core::{BuildingRecord, Channel, ChannelData, RecordBuilder};
use crate::error::{ProfileError, Result};
use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelFile {
    pub values: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid: Option<Vec<bool>>,
}

impl ChannelFile {
    fn into_data(self, channel: Channel) -> Result<ChannelData> {
        match self.valid {
            Some(valid) => ChannelData::new(self.values, valid).map_err(|e| {
                ProfileError::DataFormat(format!("{}: {e}", channel.key()))
            }),
            None => Ok(ChannelData::all_valid(self.values)),
        }
    }
}

/// On-disk layout of a building dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetFile {
    pub bid: String,
    #[serde(default)]
    pub naics: Option<String>,
    #[serde(default)]
    pub btype: Option<String>,
    #[serde(default = "default_timezone")]
    pub timezone: String,
    pub times: Vec<DateTime<Utc>>,
    pub kwhs: ChannelFile,
    #[serde(default)]
    pub temps: Option<ChannelFile>,
}

fn default_timezone() -> String {
    "UTC".to_string()
}

impl DatasetFile {
    /// Validate and convert into a record.
    pub fn into_record(self) -> Result<BuildingRecord> {
        let tz: Tz = self.timezone.parse().map_err(|_| {
            ProfileError::DataFormat(format!("unknown time zone {}", self.timezone))
        })?;

        let mut builder = RecordBuilder::new()
            .id(self.bid)
            .timezone(tz)
            .timestamps(self.times)
            .channel(Channel::Usage, self.kwhs.into_data(Channel::Usage)?);
        if let Some(naics) = self.naics {
            builder = builder.naics(naics);
        }
        if let Some(btype) = self.btype {
            builder = builder.building_type(btype);
        }
        if let Some(temps) = self.temps {
            builder = builder.channel(Channel::Temperature, temps.into_data(Channel::Temperature)?);
        }

        builder.build()
    }
}

/// Parse a dataset from a JSON string.
pub fn parse_dataset(json: &str) -> Result<BuildingRecord> {
    let file: DatasetFile = serde_json::from_str(json)?;
    file.into_record()
}

/// Load a dataset file.
pub fn load_dataset(path: impl AsRef<Path>) -> Result<BuildingRecord> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .map_err(|e| ProfileError::Io(format!("{}: {e}", path.display())))?;
    let record = parse_dataset(&content)?;
    match record.infer_frequency(0.5) {
        Ok(step) if step != Duration::hours(1) => tracing::warn!(
            path = %path.display(),
            step_seconds = step.num_seconds(),
            "dataset is not hourly, day and week periods will be misaligned"
        ),
        Ok(_) => {}
        Err(error) => tracing::debug!(path = %path.display(), %error, "sampling step unknown"),
    }
    tracing::debug!(
        path = %path.display(),
        record = record.id(),
        samples = record.len(),
        "dataset loaded"
    );
    Ok(record)
}
