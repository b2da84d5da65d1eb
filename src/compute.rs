//! Solar position calculations and the validation run.

use crate::data::{CoordTimeStream, Parameters};
use chrono::{DateTime, FixedOffset, Utc};
use std::collections::HashMap;
use sunpos::validation::{
    ReferenceModel, SampleWindow, ValidationError, ValidationReport, Validator, angular_distance,
};
use sunpos::{SunPosition, sun_position_at};

/// Reference position and the formula's deviation from it, in degrees.
#[derive(Debug, Clone, Copy)]
pub struct Comparison {
    pub reference: SunPosition,
    pub delta_t: f64,
    pub azimuth_error: f64,
    /// Signed, computed minus reference.
    pub altitude_error: f64,
}

#[derive(Debug, Clone)]
pub struct PositionRecord {
    pub lat: f64,
    pub lon: f64,
    pub datetime: DateTime<FixedOffset>,
    pub position: SunPosition,
    pub comparison: Option<Comparison>,
}

pub type RecordStream = Box<dyn Iterator<Item = Result<PositionRecord, ValidationError>>>;

pub fn compare(
    position: &SunPosition,
    datetime: DateTime<Utc>,
    lat: f64,
    lon: f64,
    reference: &ReferenceModel,
) -> Result<Comparison, ValidationError> {
    let delta_t = reference.delta_t_for(datetime)?;
    let reference = ReferenceModel::new(Some(delta_t)).position(datetime, lat, lon)?;
    Ok(Comparison {
        reference,
        delta_t,
        azimuth_error: angular_distance(position.azimuth(), reference.azimuth()).to_degrees(),
        altitude_error: position.altitude_degrees() - reference.altitude_degrees(),
    })
}

pub fn calculate_position(
    lat: f64,
    lon: f64,
    dt: DateTime<FixedOffset>,
    reference: Option<&ReferenceModel>,
) -> Result<PositionRecord, ValidationError> {
    let position = sun_position_at(&dt, lat, lon);
    let comparison = reference
        .map(|model| compare(&position, dt.with_timezone(&Utc), lat, lon, model))
        .transpose()?;

    Ok(PositionRecord {
        lat,
        lon,
        datetime: dt,
        position,
        comparison,
    })
}

// Apply calculations to a stream of data points
pub fn calculate_stream(data: CoordTimeStream, params: &Parameters) -> RecordStream {
    if !params.compare {
        return Box::new(data.map(|(lat, lon, dt)| calculate_position(lat, lon, dt, None)));
    }

    let model = ReferenceModel::new(params.deltat);
    // Delta T only depends on the instant, so grid sweeps estimate it once
    let mut delta_t_cache: HashMap<DateTime<FixedOffset>, ReferenceModel> = HashMap::new();

    Box::new(data.map(move |(lat, lon, dt)| {
        let fixed = match delta_t_cache.get(&dt) {
            Some(cached) => *cached,
            None => {
                let delta_t = model.delta_t_for(dt.with_timezone(&Utc))?;
                let cached = ReferenceModel::new(Some(delta_t));
                delta_t_cache.insert(dt, cached);
                cached
            }
        };
        calculate_position(lat, lon, dt, Some(&fixed))
    }))
}

/// Outcome of a `check` run.
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub report: ValidationReport,
    pub seed: u64,
    pub window: SampleWindow,
    /// Fixed delta T, or None when estimated per sample.
    pub delta_t: Option<f64>,
}

pub fn run_check(
    window: SampleWindow,
    seed: u64,
    samples: usize,
    reference: ReferenceModel,
    params: &Parameters,
) -> Result<CheckResult, ValidationError> {
    let mut validator = Validator::new(window, seed, reference);
    let progress = progress::Progress::new(samples, params.check.progress);

    let report = validator.run(samples, |_| progress.inc());
    progress.finish();

    Ok(CheckResult {
        report: report?,
        seed,
        window,
        delta_t: params.deltat,
    })
}

#[cfg(feature = "progress")]
mod progress {
    use indicatif::{ProgressBar, ProgressStyle};

    pub struct Progress(ProgressBar);

    impl Progress {
        pub fn new(total: usize, enabled: bool) -> Self {
            if !enabled {
                return Self(ProgressBar::hidden());
            }

            let pb = ProgressBar::new(total as u64);
            let style = ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} samples ({eta})")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-");
            pb.set_style(style);
            Self(pb)
        }

        pub fn inc(&self) {
            self.0.inc(1);
        }

        pub fn finish(&self) {
            self.0.finish_and_clear();
        }
    }
}

#[cfg(not(feature = "progress"))]
mod progress {
    pub struct Progress;

    impl Progress {
        pub fn new(_total: usize, _enabled: bool) -> Self {
            Self
        }

        pub fn inc(&self) {}

        pub fn finish(&self) {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::parse_datetime_string;

    #[test]
    fn test_position_without_compare() {
        let dt = parse_datetime_string("2024-06-21T00:00:00Z").unwrap();
        let record = calculate_position(51.477928, 0.0, dt, None).unwrap();
        assert!((record.position.altitude_degrees() + 15.0856).abs() < 1e-3);
        assert!(record.comparison.is_none());
    }

    #[test]
    fn test_compare_at_midnight_is_close() {
        let dt = parse_datetime_string("2024-06-21T00:00:00Z").unwrap();
        let model = ReferenceModel::new(Some(69.0));
        let record = calculate_position(40.0, -75.0, dt, Some(&model)).unwrap();
        let comparison = record.comparison.unwrap();
        assert_eq!(comparison.delta_t, 69.0);
        assert!(comparison.azimuth_error < 0.1);
        assert!(comparison.altitude_error.abs() < 0.1);
    }

    #[test]
    fn test_stream_with_compare_estimates_delta_t() {
        let dt = parse_datetime_string("2024-06-21").unwrap();
        let data: CoordTimeStream =
            Box::new(vec![(10.0, 20.0, dt), (11.0, 20.0, dt)].into_iter());
        let params = Parameters {
            compare: true,
            ..Parameters::default()
        };
        let records: Vec<_> = calculate_stream(data, &params)
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(records.len(), 2);
        let delta_t = records[0].comparison.unwrap().delta_t;
        assert!(delta_t > 60.0 && delta_t < 80.0);
        assert_eq!(records[1].comparison.unwrap().delta_t, delta_t);
    }

    #[test]
    fn test_run_check_reports_seed() {
        let mut params = Parameters::default();
        params.check.progress = false;
        let result = run_check(
            SampleWindow::default(),
            7,
            20,
            ReferenceModel::default(),
            &params,
        )
        .unwrap();
        assert_eq!(result.seed, 7);
        assert_eq!(result.report.samples, 20);
        assert!(result.report.mean_azimuth_error < 1.0);
    }
}
