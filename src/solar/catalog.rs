//! Region and site lookup for sun-position calculations.
//!
//! The catalog is loaded once by the driver and passed by reference; it is
//! never mutated afterwards.

use crate::error::{ProfileError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Geographic position in degrees (north and east positive).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        let coords = Self {
            latitude,
            longitude,
        };
        coords.validate()?;
        Ok(coords)
    }

    fn validate(&self) -> Result<()> {
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(ProfileError::Config(format!(
                "latitude {} is outside [-90, 90]",
                self.latitude
            )));
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(ProfileError::Config(format!(
                "longitude {} is outside [-180, 180]",
                self.longitude
            )));
        }
        Ok(())
    }
}

/// Sites of one region (for example a US state) and its default site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    /// Site used when no site is requested or the requested one is unknown.
    pub default: String,
    pub sites: BTreeMap<String, Coordinates>,
}

/// Where a building is, as requested by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub region: String,
    #[serde(default)]
    pub site: Option<String>,
}

impl Location {
    pub fn region(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            site: None,
        }
    }

    pub fn with_site(mut self, site: impl Into<String>) -> Self {
        self.site = Some(site.into());
        self
    }
}

impl Default for Location {
    fn default() -> Self {
        Self::region("IL")
    }
}

/// Region → sites table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SiteCatalog {
    regions: BTreeMap<String, Region>,
}

impl Default for SiteCatalog {
    fn default() -> Self {
        let mut sites = BTreeMap::new();
        sites.insert(
            "Springfield".to_string(),
            Coordinates {
                latitude: 39.7817,
                longitude: -89.6501,
            },
        );
        sites.insert(
            "Chicago".to_string(),
            Coordinates {
                latitude: 41.8781,
                longitude: -87.6298,
            },
        );
        Self::new().with_region(
            "IL",
            Region {
                default: "Springfield".to_string(),
                sites,
            },
        )
    }
}

impl SiteCatalog {
    /// Empty catalog.
    pub fn new() -> Self {
        Self {
            regions: BTreeMap::new(),
        }
    }

    pub fn with_region(mut self, name: impl Into<String>, region: Region) -> Self {
        self.regions.insert(name.into(), region);
        self
    }

    pub fn regions(&self) -> impl Iterator<Item = &str> {
        self.regions.keys().map(String::as_str)
    }

    /// Check every region names an existing default site with valid coordinates.
    pub fn validate(&self) -> Result<()> {
        for (name, region) in &self.regions {
            if !region.sites.contains_key(&region.default) {
                return Err(ProfileError::Config(format!(
                    "default site {} of region {name} is not listed",
                    region.default
                )));
            }
            for coords in region.sites.values() {
                coords.validate()?;
            }
        }
        Ok(())
    }

    /// Coordinates for `location`.
    ///
    /// An unknown site falls back to the region's default site. An unknown
    /// region is a [`ProfileError::LookupFailure`].
    pub fn resolve(&self, location: &Location) -> Result<Coordinates> {
        let region = self
            .regions
            .get(&location.region)
            .or_else(|| {
                self.regions
                    .iter()
                    .find(|(name, _)| name.eq_ignore_ascii_case(&location.region))
                    .map(|(_, region)| region)
            })
            .ok_or_else(|| {
                ProfileError::LookupFailure(format!("unknown region {}", location.region))
            })?;

        if let Some(site) = &location.site {
            let found = region
                .sites
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(site))
                .map(|(_, coords)| *coords);
            match found {
                Some(coords) => return Ok(coords),
                None => tracing::warn!(
                    region = %location.region,
                    site = %site,
                    default = %region.default,
                    "site not found, using region default"
                ),
            }
        }

        region.sites.get(&region.default).copied().ok_or_else(|| {
            ProfileError::LookupFailure(format!(
                "default site {} of region {} is not listed",
                region.default, location.region
            ))
        })
    }
}
