//! Randomized cross-checking of [`sun_position`] against NREL SPA.
//!
//! A [`Sampler`] draws whole UTC days from a calendar window and random
//! observer locations. Each sample is evaluated with both the low-precision
//! formula and the [`ReferenceModel`], and the differences are accumulated in
//! [`ErrorStats`].

use crate::position::{SunPosition, sun_position};
use chrono::{DateTime, Days, NaiveDate, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use solar_positioning::spa;
use solar_positioning::time::DeltaT;
use std::f64::consts::TAU;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError(pub String);

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ValidationError {}

impl From<String> for ValidationError {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Inclusive range of calendar days to sample from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl SampleWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ValidationError> {
        if start > end {
            return Err(format!("Sample window start {} is after end {}", start, end).into());
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    fn span_days(&self) -> u64 {
        (self.end - self.start).num_days().unsigned_abs()
    }
}

impl Default for SampleWindow {
    fn default() -> Self {
        Self {
            start: NaiveDate::from_ymd_opt(2020, 1, 1).expect("valid calendar date"),
            end: NaiveDate::from_ymd_opt(2030, 12, 31).expect("valid calendar date"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub datetime: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
}

impl Sample {
    pub fn epoch_millis(&self) -> f64 {
        self.datetime.timestamp_millis() as f64
    }
}

/// Seeded source of validation samples.
///
/// Timestamps fall on 00:00:00 UTC. The formula's sidereal term is only
/// aligned with the true sidereal time at the start of the UTC day.
pub struct Sampler {
    rng: StdRng,
    window: SampleWindow,
}

impl Sampler {
    pub fn new(window: SampleWindow, seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            window,
        }
    }

    pub fn next_sample(&mut self) -> Sample {
        let offset = self.rng.gen_range(0..=self.window.span_days());
        let date = self
            .window
            .start
            .checked_add_days(Days::new(offset))
            .unwrap_or(self.window.end);
        let midnight = date.and_hms_opt(0, 0, 0).expect("midnight is always valid");
        let datetime = Utc.from_utc_datetime(&midnight);

        Sample {
            datetime,
            latitude: self.rng.gen_range(-90.0..=90.0),
            longitude: self.rng.gen_range(-180.0..=180.0),
        }
    }
}

impl Iterator for Sampler {
    type Item = Sample;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.next_sample())
    }
}

/// SPA evaluated for a sea-level observer without refraction.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReferenceModel {
    delta_t: Option<f64>,
}

impl ReferenceModel {
    /// `delta_t` in seconds; `None` estimates it from the sample date.
    pub fn new(delta_t: Option<f64>) -> Self {
        Self { delta_t }
    }

    pub fn delta_t_for(&self, datetime: DateTime<Utc>) -> Result<f64, ValidationError> {
        match self.delta_t {
            Some(value) => Ok(value),
            None => DeltaT::estimate_from_date_like(datetime).map_err(|e| {
                ValidationError(format!(
                    "Failed to estimate delta T for {}: {}",
                    datetime.to_rfc3339(),
                    e
                ))
            }),
        }
    }

    pub fn position(
        &self,
        datetime: DateTime<Utc>,
        latitude: f64,
        longitude: f64,
    ) -> Result<SunPosition, ValidationError> {
        let delta_t = self.delta_t_for(datetime)?;
        let position = spa::solar_position(datetime, latitude, longitude, 0.0, delta_t, None)
            .map_err(|e| {
                ValidationError(format!(
                    "Reference calculation failed at {} ({}, {}): {}",
                    datetime.to_rfc3339(),
                    latitude,
                    longitude,
                    e
                ))
            })?;

        Ok(SunPosition::from_radians(
            position.azimuth().to_radians(),
            position.elevation_angle().to_radians(),
        ))
    }
}

/// Shortest angular distance between two azimuths in radians.
pub fn angular_distance(a: f64, b: f64) -> f64 {
    let diff = (a - b).abs();
    diff.min((TAU - diff).abs())
}

/// Running error accumulator, in radians.
#[derive(Debug, Clone, Default)]
pub struct ErrorStats {
    count: usize,
    azimuth_sum: f64,
    altitude_abs_sum: f64,
    altitude_signed_sum: f64,
    max_azimuth: f64,
    max_altitude: f64,
}

impl ErrorStats {
    pub fn record(&mut self, computed: &SunPosition, reference: &SunPosition) {
        let az_error = angular_distance(computed.azimuth(), reference.azimuth());
        let alt_error = computed.altitude() - reference.altitude();

        self.count += 1;
        self.azimuth_sum += az_error;
        self.altitude_abs_sum += alt_error.abs();
        self.altitude_signed_sum += alt_error;
        self.max_azimuth = self.max_azimuth.max(az_error);
        self.max_altitude = self.max_altitude.max(alt_error.abs());
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn report(&self) -> ValidationReport {
        let mean = |sum: f64| {
            if self.count == 0 {
                0.0
            } else {
                (sum / self.count as f64).to_degrees()
            }
        };

        ValidationReport {
            samples: self.count,
            mean_azimuth_error: mean(self.azimuth_sum),
            mean_altitude_error: mean(self.altitude_abs_sum),
            altitude_bias: mean(self.altitude_signed_sum),
            max_azimuth_error: self.max_azimuth.to_degrees(),
            max_altitude_error: self.max_altitude.to_degrees(),
        }
    }
}

/// Error summary in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidationReport {
    pub samples: usize,
    pub mean_azimuth_error: f64,
    pub mean_altitude_error: f64,
    /// Mean signed altitude difference (computed minus reference).
    pub altitude_bias: f64,
    pub max_azimuth_error: f64,
    pub max_altitude_error: f64,
}

pub struct Validator {
    sampler: Sampler,
    reference: ReferenceModel,
}

impl Validator {
    pub fn new(window: SampleWindow, seed: u64, reference: ReferenceModel) -> Self {
        Self {
            sampler: Sampler::new(window, seed),
            reference,
        }
    }

    /// Evaluate `samples` random points, calling `on_sample` after each one.
    pub fn run<F>(
        &mut self,
        samples: usize,
        mut on_sample: F,
    ) -> Result<ValidationReport, ValidationError>
    where
        F: FnMut(&Sample),
    {
        let mut stats = ErrorStats::default();

        for sample in self.sampler.by_ref().take(samples) {
            let computed = sun_position(sample.epoch_millis(), sample.latitude, sample.longitude);
            let reference =
                self.reference
                    .position(sample.datetime, sample.latitude, sample.longitude)?;
            stats.record(&computed, &reference);
            on_sample(&sample);
        }

        Ok(stats.report())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_window_rejects_reversed_bounds() {
        assert!(SampleWindow::new(date(2030, 1, 1), date(2020, 1, 1)).is_err());
        assert!(SampleWindow::new(date(2024, 3, 1), date(2024, 3, 1)).is_ok());
    }

    #[test]
    fn test_default_window() {
        let window = SampleWindow::default();
        assert_eq!(window.start(), date(2020, 1, 1));
        assert_eq!(window.end(), date(2030, 12, 31));
        assert_eq!(window.span_days(), 4017);
    }

    #[test]
    fn test_sampler_stays_in_window_at_midnight() {
        let window = SampleWindow::new(date(2024, 1, 1), date(2024, 1, 31)).unwrap();
        for sample in Sampler::new(window, 42).take(500) {
            let day = sample.datetime.date_naive();
            assert!(day >= window.start() && day <= window.end());
            assert_eq!(sample.datetime.num_seconds_from_midnight(), 0);
            assert!((-90.0..=90.0).contains(&sample.latitude));
            assert!((-180.0..=180.0).contains(&sample.longitude));
        }
    }

    #[test]
    fn test_sampler_is_reproducible() {
        let window = SampleWindow::default();
        let a: Vec<Sample> = Sampler::new(window, 7).take(20).collect();
        let b: Vec<Sample> = Sampler::new(window, 7).take(20).collect();
        let c: Vec<Sample> = Sampler::new(window, 8).take(20).collect();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_single_day_window() {
        let window = SampleWindow::new(date(2024, 6, 21), date(2024, 6, 21)).unwrap();
        let sample = Sampler::new(window, 1).next_sample();
        assert_eq!(sample.datetime, Utc.with_ymd_and_hms(2024, 6, 21, 0, 0, 0).unwrap());
        assert_eq!(sample.epoch_millis(), 1_718_928_000_000.0);
    }

    #[test]
    fn test_angular_distance_wraps() {
        assert!((angular_distance(0.1, TAU - 0.1) - 0.2).abs() < 1e-12);
        assert!((angular_distance(TAU - 0.1, 0.1) - 0.2).abs() < 1e-12);
        assert!((angular_distance(1.0, 2.5) - 1.5).abs() < 1e-12);
        assert_eq!(angular_distance(3.0, 3.0), 0.0);
    }

    #[test]
    fn test_error_stats_report() {
        let mut stats = ErrorStats::default();
        let reference = SunPosition::from_radians(0.05, 0.5);
        stats.record(
            &SunPosition::from_radians(TAU - 0.05, 0.5 + 0.02),
            &reference,
        );
        stats.record(&SunPosition::from_radians(0.05, 0.5 - 0.04), &reference);

        assert_eq!(stats.count(), 2);
        let report = stats.report();
        assert_eq!(report.samples, 2);
        assert!((report.mean_azimuth_error - 0.05_f64.to_degrees()).abs() < 1e-9);
        assert!((report.max_azimuth_error - 0.1_f64.to_degrees()).abs() < 1e-9);
        assert!((report.mean_altitude_error - 0.03_f64.to_degrees()).abs() < 1e-9);
        assert!((report.altitude_bias - (-0.01_f64).to_degrees()).abs() < 1e-9);
        assert!((report.max_altitude_error - 0.04_f64.to_degrees()).abs() < 1e-9);
    }

    #[test]
    fn test_empty_stats_report_zeroes() {
        let report = ErrorStats::default().report();
        assert_eq!(report.samples, 0);
        assert_eq!(report.mean_azimuth_error, 0.0);
        assert_eq!(report.max_altitude_error, 0.0);
    }

    #[test]
    fn test_reference_uses_fixed_delta_t() {
        let model = ReferenceModel::new(Some(69.0));
        let dt = Utc.with_ymd_and_hms(2024, 6, 21, 0, 0, 0).unwrap();
        assert_eq!(model.delta_t_for(dt).unwrap(), 69.0);

        let estimated = ReferenceModel::default().delta_t_for(dt).unwrap();
        assert!(estimated > 60.0 && estimated < 80.0);
    }

    #[test]
    fn test_reference_close_to_formula_at_midnight() {
        let dt = Utc.with_ymd_and_hms(2024, 6, 21, 0, 0, 0).unwrap();
        let reference = ReferenceModel::default()
            .position(dt, 51.477928, 0.0)
            .unwrap();
        let computed = sun_position(dt.timestamp_millis() as f64, 51.477928, 0.0);

        assert!(angular_distance(computed.azimuth(), reference.azimuth()).to_degrees() < 0.1);
        assert!((computed.altitude_degrees() - reference.altitude_degrees()).abs() < 0.1);
    }

    #[test]
    fn test_validator_counts_samples() {
        let mut calls = 0;
        let report = Validator::new(SampleWindow::default(), 3, ReferenceModel::default())
            .run(25, |_| calls += 1)
            .unwrap();
        assert_eq!(calls, 25);
        assert_eq!(report.samples, 25);
        assert!(report.mean_azimuth_error < 1.0);
        assert!(report.mean_altitude_error < 1.0);
    }
}
