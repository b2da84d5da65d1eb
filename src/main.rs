//! Low-precision sun position CLI - entry point.

mod cli;
mod compute;
mod data;
mod error;
mod output;
mod performance;
mod planner;

use crate::error::CliError;
use crate::performance::PerformanceTracker;
use crate::planner::{ComputePlan, Job, OutputPlan};
use std::io::{self, BufWriter};

fn run(plan: ComputePlan, output_plan: &OutputPlan) -> Result<usize, String> {
    let ComputePlan { job, params } = plan;
    let stdout = io::stdout();
    let mut writer = BufWriter::new(stdout.lock());

    match job {
        Job::Positions(data_iter) => {
            let results = compute::calculate_stream(data_iter, &params);
            output::dispatch_output(results, &params, output_plan, &mut writer)
                .map_err(|e| e.to_string())
        }
        Job::Check {
            window,
            seed,
            samples,
            reference,
        } => {
            let result = compute::run_check(window, seed, samples, reference, &params)
                .map_err(|e| e.to_string())?;
            output::write_check_report(&result, &params, &mut writer)
                .map_err(|e| e.to_string())?;
            Ok(result.report.samples)
        }
    }
}

fn main() {
    let args: Vec<String> = std::env::args().collect();

    let (source, command, params) = match cli::parse_cli(args) {
        Ok(parsed) => parsed,
        Err(CliError::Exit(message)) => {
            println!("{}", message);
            std::process::exit(0);
        }
        Err(CliError::Message(message)) => {
            eprintln!("Error: {}", message);
            std::process::exit(1);
        }
    };

    let tracker = PerformanceTracker::create(params.perf);

    let (compute_plan, output_plan) = match planner::build_job(source, command, params) {
        Ok(spec) => spec,
        Err(err) => {
            eprintln!("Error: {}", err);
            std::process::exit(1);
        }
    };

    match run(compute_plan, &output_plan) {
        Ok(count) => PerformanceTracker::report_if_needed(&tracker, count),
        Err(err) => {
            eprintln!("Error: {}", err);
            std::process::exit(1);
        }
    }
}
