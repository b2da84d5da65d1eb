//! Low-precision solar position from epoch milliseconds.
//!
//! Mean longitude, mean anomaly, ecliptic obliquity and mean sidereal time are
//! combined into horizontal coordinates. All angles returned are in radians.

use chrono::{DateTime, TimeZone};
use std::f64::consts::TAU;

const MILLIS_PER_DAY: f64 = 86_400_000.0;
/// Days from the Unix epoch to J2000.0 (2000-01-01T12:00:00Z).
const UNIX_TO_J2000_DAYS: f64 = 10_957.5;

/// Horizontal coordinates of the sun.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SunPosition {
    azimuth: f64,
    altitude: f64,
}

impl SunPosition {
    /// Build from radians; azimuth is wrapped into `[0, 2π)`.
    pub fn from_radians(azimuth: f64, altitude: f64) -> Self {
        Self {
            azimuth: normalize_radians(azimuth),
            altitude,
        }
    }

    /// Azimuth in radians, clockwise from north, in `[0, 2π)`.
    pub fn azimuth(&self) -> f64 {
        self.azimuth
    }

    /// Altitude above the horizon in radians, in `[-π/2, π/2]`.
    pub fn altitude(&self) -> f64 {
        self.altitude
    }

    pub fn azimuth_degrees(&self) -> f64 {
        self.azimuth.to_degrees()
    }

    pub fn altitude_degrees(&self) -> f64 {
        self.altitude.to_degrees()
    }

    pub fn zenith_degrees(&self) -> f64 {
        90.0 - self.altitude_degrees()
    }
}

/// Compute the sun's azimuth and altitude.
///
/// `epoch_millis` counts milliseconds since 1970-01-01T00:00:00Z and may be
/// negative. Coordinates are not validated; NaN and infinite inputs propagate
/// into the result.
///
/// The sidereal time term adds the seconds of the UTC day to an hour count, so
/// results track the true sun at 00:00 UTC and drift away from it during the
/// day. This matches the reference formula and is kept as-is.
///
/// # Example
/// ```
/// let pos = sunpos::sun_position(1_718_928_000_000.0, 51.477928, 0.0);
/// assert!((pos.altitude_degrees() - -15.0856).abs() < 1e-3);
/// ```
pub fn sun_position(epoch_millis: f64, latitude_deg: f64, longitude_deg: f64) -> SunPosition {
    let days = days_since_j2000(epoch_millis);
    let (ra, dec) = equatorial(days);

    let lmst = local_sidereal_angle(epoch_millis, days, longitude_deg);
    let ha = lmst - ra;

    horizontal(ha, dec, latitude_deg.to_radians())
}

/// Same as [`sun_position`] for a timezone-aware timestamp.
pub fn sun_position_at<Tz: TimeZone>(
    datetime: &DateTime<Tz>,
    latitude_deg: f64,
    longitude_deg: f64,
) -> SunPosition {
    sun_position(
        datetime.timestamp_millis() as f64,
        latitude_deg,
        longitude_deg,
    )
}

fn days_since_j2000(epoch_millis: f64) -> f64 {
    epoch_millis / MILLIS_PER_DAY - UNIX_TO_J2000_DAYS
}

/// Right ascension and declination in radians.
fn equatorial(days: f64) -> (f64, f64) {
    let mean_long = (280.460 + 0.985_647_4 * days).rem_euclid(360.0);
    let mean_anom = (357.528 + 0.985_600_3 * days).rem_euclid(360.0).to_radians();
    let ecl_long =
        (mean_long + 1.915 * mean_anom.sin() + 0.020 * (2.0 * mean_anom).sin()).to_radians();
    let obliquity = (23.439 - 0.000_000_4 * days).to_radians();

    let sin_ecl = ecl_long.sin();
    let ra = (obliquity.cos() * sin_ecl).atan2(ecl_long.cos());
    let dec = (obliquity.sin() * sin_ecl).asin();
    (ra, dec)
}

/// Local mean sidereal time as an angle in radians.
fn local_sidereal_angle(epoch_millis: f64, days: f64, longitude_deg: f64) -> f64 {
    let seconds_of_day = epoch_millis.rem_euclid(MILLIS_PER_DAY) / 1000.0;
    let gmst = (6.697_375 + 0.065_709_824_2 * days + seconds_of_day).rem_euclid(24.0);
    (gmst * 15.0 + longitude_deg).rem_euclid(360.0).to_radians()
}

fn horizontal(ha: f64, dec: f64, lat: f64) -> SunPosition {
    let (sin_lat, cos_lat) = lat.sin_cos();
    let (sin_dec, cos_dec) = dec.sin_cos();
    let (sin_ha, cos_ha) = ha.sin_cos();

    // Only matters when floating-point rounding pushes the sine past ±1
    let altitude = (sin_lat * sin_dec + cos_lat * cos_dec * cos_ha)
        .clamp(-1.0, 1.0)
        .asin();
    let azimuth = (-sin_ha * cos_dec).atan2(sin_dec * cos_lat - sin_lat * cos_dec * cos_ha);

    SunPosition::from_radians(azimuth, altitude)
}

/// Wrap into `[0, 2π)`. `rem_euclid` can round up to exactly `2π` for tiny
/// negative inputs.
fn normalize_radians(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    if wrapped >= TAU { 0.0 } else { wrapped }
}
