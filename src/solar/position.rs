//! Solar altitude from the NOAA general solar position approximation.

use super::catalog::Coordinates;
use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Timelike};
use std::f64::consts::PI;

/// Sine of the solar altitude at `coords` and `timestamp`, in [-1, 1].
///
/// 1 is the sun at zenith, 0 the horizon, negative values night.
pub fn sun_intensity<Z: TimeZone>(coords: &Coordinates, timestamp: &DateTime<Z>) -> f64 {
    let utc = timestamp.naive_utc();
    let days_in_year = if NaiveDate::from_ymd_opt(utc.year(), 2, 29).is_some() {
        366.0
    } else {
        365.0
    };
    let hour = utc.hour() as f64 + utc.minute() as f64 / 60.0 + utc.second() as f64 / 3600.0;

    // Fractional year in radians.
    let gamma = 2.0 * PI / days_in_year * (utc.ordinal0() as f64 + (hour - 12.0) / 24.0);

    let eq_time = 229.18
        * (0.000075 + 0.001868 * gamma.cos()
            - 0.032077 * gamma.sin()
            - 0.014615 * (2.0 * gamma).cos()
            - 0.040849 * (2.0 * gamma).sin());

    let declination = 0.006918 - 0.399912 * gamma.cos() + 0.070257 * gamma.sin()
        - 0.006758 * (2.0 * gamma).cos()
        + 0.000907 * (2.0 * gamma).sin()
        - 0.002697 * (3.0 * gamma).cos()
        + 0.00148 * (3.0 * gamma).sin();

    // True solar time in minutes.
    let solar_minutes = hour * 60.0 + eq_time + 4.0 * coords.longitude;
    let hour_angle = (solar_minutes / 4.0 - 180.0).to_radians();

    let lat = coords.latitude.to_radians();
    let sin_altitude =
        lat.sin() * declination.sin() + lat.cos() * declination.cos() * hour_angle.cos();

    sin_altitude.clamp(-1.0, 1.0)
}

/// Sun intensity with night clamped to zero.
pub fn daylight<Z: TimeZone>(coords: &Coordinates, timestamp: &DateTime<Z>) -> f64 {
    sun_intensity(coords, timestamp).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn springfield() -> Coordinates {
        Coordinates {
            latitude: 39.7817,
            longitude: -89.6501,
        }
    }

    #[test]
    fn summer_noon_is_high_and_midnight_is_dark() {
        // Local solar noon in central Illinois is about 18:00 UTC.
        let noon = Utc.with_ymd_and_hms(2011, 6, 21, 18, 0, 0).unwrap();
        let midnight = Utc.with_ymd_and_hms(2011, 6, 21, 6, 0, 0).unwrap();

        // Altitude near 73.6 degrees.
        let high = sun_intensity(&springfield(), &noon);
        assert!((high - 0.959).abs() < 0.01, "got {high}");
        assert!(sun_intensity(&springfield(), &midnight) < -0.3);
    }

    #[test]
    fn winter_noon_is_lower_than_summer_noon() {
        let summer = Utc.with_ymd_and_hms(2011, 6, 21, 18, 0, 0).unwrap();
        let winter = Utc.with_ymd_and_hms(2011, 12, 21, 18, 0, 0).unwrap();

        let s = sun_intensity(&springfield(), &summer);
        let w = sun_intensity(&springfield(), &winter);
        // Winter altitude near 26.8 degrees.
        assert!((w - 0.45).abs() < 0.02, "got {w}");
        assert!(s > w);
    }

    #[test]
    fn equator_equinox_noon_is_near_zenith() {
        let coords = Coordinates {
            latitude: 0.0,
            longitude: 0.0,
        };
        let noon = Utc.with_ymd_and_hms(2011, 3, 20, 12, 7, 0).unwrap();
        assert!(sun_intensity(&coords, &noon) > 0.999);
    }

    #[test]
    fn values_stay_in_range_and_daylight_clamps() {
        let start = Utc.with_ymd_and_hms(2011, 1, 1, 0, 0, 0).unwrap();
        for h in 0..(24 * 365) {
            let t = start + Duration::hours(h);
            let v = sun_intensity(&springfield(), &t);
            assert!((-1.0..=1.0).contains(&v));
            assert!(daylight(&springfield(), &t) >= 0.0);
        }
    }

    #[test]
    fn time_zone_of_timestamp_does_not_matter() {
        let utc = Utc.with_ymd_and_hms(2011, 7, 4, 20, 0, 0).unwrap();
        let local = utc.with_timezone(&chrono_tz::US::Central);
        assert_eq!(
            sun_intensity(&springfield(), &utc),
            sun_intensity(&springfield(), &local)
        );
    }
}
