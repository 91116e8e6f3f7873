//! Sun position for a building's location.
//!
//! # Example
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use kwh_profile::solar::{sun_intensity, Location, SiteCatalog};
//!
//! let catalog = SiteCatalog::default();
//! let coords = catalog.resolve(&Location::region("IL")).unwrap();
//! let noon = Utc.with_ymd_and_hms(2011, 6, 21, 18, 0, 0).unwrap();
//!
//! assert!(sun_intensity(&coords, &noon) > 0.9);
//! ```

mod catalog;
mod position;

pub use catalog::{Coordinates, Location, Region, SiteCatalog};
pub use position::{daylight, sun_intensity};
