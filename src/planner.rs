//! Execution planning: turn parsed CLI input into the compute and output plans used by main.

use crate::data::{self, Command, CoordTimeStream, DataSource, Parameters};
use crate::error::PlannerError;
use sunpos::validation::{ReferenceModel, SampleWindow};

pub enum Job {
    Positions(CoordTimeStream),
    Check {
        window: SampleWindow,
        seed: u64,
        samples: usize,
        reference: ReferenceModel,
    },
}

pub struct ComputePlan {
    pub job: Job,
    pub params: Parameters,
}

pub struct OutputPlan {
    pub show_inputs: bool,
    /// Whether latitude and longitude vary across records.
    pub varies: (bool, bool),
}

pub fn build_job(
    source: DataSource,
    command: Command,
    params: Parameters,
) -> Result<(ComputePlan, OutputPlan), PlannerError> {
    let show_inputs = params.output.show_inputs.unwrap_or(source.is_range());

    let (job, varies) = match (command, source) {
        (Command::Position, DataSource::Points(location, time)) => {
            let varies = location.varies();
            let data_iter = data::expand_points(location, &time)?;
            (Job::Positions(data_iter), varies)
        }
        (Command::Check, DataSource::Sampled) => {
            let window = SampleWindow::new(params.check.from, params.check.to)?;
            let job = Job::Check {
                window,
                seed: params.check.seed.unwrap_or_else(rand::random),
                samples: params.check.samples,
                reference: ReferenceModel::new(params.deltat),
            };
            (job, (false, false))
        }
        (Command::Position, DataSource::Sampled) => {
            return Err("Command position needs latitude, longitude and dateTime".into());
        }
        (Command::Check, DataSource::Points(..)) => {
            return Err("Command check does not take positional arguments".into());
        }
    };

    let compute_plan = ComputePlan { job, params };
    let output_plan = OutputPlan {
        show_inputs,
        varies,
    };
    Ok((compute_plan, output_plan))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{LocationSource, TimeSource};

    #[test]
    fn test_position_job_expands_grid() {
        let source = DataSource::Points(
            LocationSource::Range {
                lat: (10.0, 12.0, 1.0),
                lon: (5.0, 5.0, 0.0),
            },
            TimeSource::Single("2024-06-21".to_string()),
        );
        let (plan, output) =
            build_job(source, Command::Position, Parameters::default()).unwrap();
        assert!(output.show_inputs);
        assert_eq!(output.varies, (true, false));
        let Job::Positions(iter) = plan.job else {
            panic!("expected position job");
        };
        assert_eq!(iter.count(), 3);
    }

    #[test]
    fn test_check_job_uses_given_seed() {
        let mut params = Parameters::default();
        params.check.seed = Some(42);
        params.check.samples = 10;
        let (plan, output) = build_job(DataSource::Sampled, Command::Check, params).unwrap();
        assert!(!output.show_inputs);
        match plan.job {
            Job::Check { seed, samples, .. } => {
                assert_eq!(seed, 42);
                assert_eq!(samples, 10);
            }
            Job::Positions(_) => panic!("expected check job"),
        }
    }

    #[test]
    fn test_check_job_rejects_reversed_window() {
        let mut params = Parameters::default();
        std::mem::swap(&mut params.check.from, &mut params.check.to);
        assert!(build_job(DataSource::Sampled, Command::Check, params).is_err());
    }

    #[test]
    fn test_mismatched_source_rejected() {
        assert!(build_job(DataSource::Sampled, Command::Position, Parameters::default()).is_err());
    }
}
