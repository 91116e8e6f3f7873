//! Report settings loaded from TOML.
//!
//! ```toml
//! [report]
//! strange_days = 4
//! threshold_percentile = 99.0
//!
//! [location]
//! region = "IL"
//! site = "Chicago"
//!
//! [sites.IL]
//! default = "Springfield"
//! sites = { Springfield = { latitude = 39.78, longitude = -89.65 } }
//!
//! [naics]
//! "611110" = "Elementary and Secondary Schools"
//! ```
//!
//! Every field has a default, so an empty file is a valid configuration.

use crate::error::{ProfileError, Result};
use crate::solar::{Location, SiteCatalog};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Tunables of the report battery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Bins of the usage histogram and of each axis of the 2-D histograms.
    pub histogram_bins: usize,
    /// Lower reference line on the usage chart, in percent.
    pub low_percentile: f64,
    /// Upper reference line on the usage chart, in percent.
    pub high_percentile: f64,
    /// Number of most atypical days to report.
    pub strange_days: usize,
    /// Number of most atypical weeks to report.
    pub strange_weeks: usize,
    /// Compare period shapes after min-max scaling.
    pub standardize: bool,
    /// Crossing threshold as a percentile of valid usage.
    pub threshold_percentile: f64,
    /// Maximum number of threshold crossings to report.
    pub max_crossings: usize,
    /// Number of largest usage increases to report.
    pub spikes: usize,
    /// Number of highest usage samples to report.
    pub peaks: usize,
    /// Samples of context on each side of spike and peak windows.
    pub context_margin: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            histogram_bins: 50,
            low_percentile: 5.0,
            high_percentile: 95.0,
            strange_days: 4,
            strange_weeks: 4,
            standardize: true,
            threshold_percentile: 99.0,
            max_crossings: 9,
            spikes: 4,
            peaks: 3,
            context_margin: 12,
        }
    }
}

impl ReportConfig {
    pub fn validate(&self) -> Result<()> {
        if self.histogram_bins == 0 {
            return Err(ProfileError::Config(
                "report.histogram_bins must be positive".to_string(),
            ));
        }
        for (name, value) in [
            ("low_percentile", self.low_percentile),
            ("high_percentile", self.high_percentile),
            ("threshold_percentile", self.threshold_percentile),
        ] {
            if !(0.0..=100.0).contains(&value) {
                return Err(ProfileError::Config(format!(
                    "report.{name} must be within [0, 100], got {value}"
                )));
            }
        }
        if self.low_percentile >= self.high_percentile {
            return Err(ProfileError::Config(
                "report.low_percentile must be below report.high_percentile".to_string(),
            ));
        }
        Ok(())
    }
}

/// Everything the driver needs besides the dataset.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub report: ReportConfig,
    pub location: Location,
    pub sites: SiteCatalog,
    /// NAICS industry code to description.
    pub naics: BTreeMap<String, String>,
}

impl Settings {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let settings: Self = toml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ProfileError::Io(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<()> {
        self.report.validate()?;
        self.sites.validate()?;
        if !self
            .sites
            .regions()
            .any(|r| r.eq_ignore_ascii_case(&self.location.region))
        {
            return Err(ProfileError::Config(format!(
                "location.region {} is not in the site catalog",
                self.location.region
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let settings = Settings::from_toml_str("").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.report.histogram_bins, 50);
        assert_eq!(settings.location.region, "IL");
        assert_eq!(settings.report.peaks, 3);
        assert!(settings.naics.is_empty());
    }

    #[test]
    fn parses_naics_table() {
        let content = r#"
            [naics]
            "611110" = "Elementary and Secondary Schools"
            "531120" = "Lessors of Nonresidential Buildings"
        "#;
        let settings = Settings::from_toml_str(content).unwrap();

        assert_eq!(settings.naics.len(), 2);
        assert_eq!(
            settings.naics.get("611110").map(String::as_str),
            Some("Elementary and Secondary Schools")
        );
        assert_eq!(settings.report, ReportConfig::default());
    }

    #[test]
    fn parses_partial_report_and_custom_sites() {
        let content = r#"
            [report]
            strange_days = 2
            standardize = false

            [location]
            region = "AZ"
            site = "Tucson"

            [sites.AZ]
            default = "Phoenix"
            sites = { Phoenix = { latitude = 33.45, longitude = -112.07 }, Tucson = { latitude = 32.22, longitude = -110.97 } }
        "#;
        let settings = Settings::from_toml_str(content).unwrap();

        assert_eq!(settings.report.strange_days, 2);
        assert!(!settings.report.standardize);
        assert_eq!(settings.report.spikes, 4);
        let coords = settings.sites.resolve(&settings.location).unwrap();
        assert!((coords.latitude - 32.22).abs() < 1e-9);
    }

    #[test]
    fn rejects_invalid_values() {
        let result = Settings::from_toml_str("[report]\nhistogram_bins = 0\n");
        assert!(matches!(result, Err(ProfileError::Config(_))));

        let result = Settings::from_toml_str("[report]\nlow_percentile = 96.0\n");
        assert!(matches!(result, Err(ProfileError::Config(_))));

        let result = Settings::from_toml_str("[location]\nregion = \"TX\"\n");
        assert!(matches!(result, Err(ProfileError::Config(_))));

        let result = Settings::from_toml_str("[report\n");
        assert!(matches!(result, Err(ProfileError::Config(_))));
    }
}
