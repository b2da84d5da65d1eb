//! Command-line parsing and validation.

use crate::data::{
    self, Command, DataSource, LocationSource, OutputFormat, Parameters, TimeSource,
};
use crate::error::CliError;
use std::collections::HashSet;

type CliResult<T> = Result<T, CliError>;

type ApplyFn = fn(Option<&str>, &mut Parameters) -> CliResult<()>;

enum OptKind {
    Value(ApplyFn),
    Flag(ApplyFn),
}

struct OptionSpec {
    name: &'static str,
    kind: OptKind,
}

const POSITION_ONLY: &[&str] = &["radians", "show-inputs", "no-show-inputs", "compare"];
const CHECK_ONLY: &[&str] = &["samples", "seed", "from", "to", "no-progress"];

const OPTION_SPECS: &[OptionSpec] = &[
    OptionSpec {
        name: "format",
        kind: OptKind::Value(|value, params| {
            let v = required_value("format", value)?;
            params.output.format = v.parse::<OutputFormat>().map_err(CliError::from)?;
            Ok(())
        }),
    },
    OptionSpec {
        name: "deltat",
        kind: OptKind::Value(|value, params| {
            let v = required_value("deltat", value)?;
            params.deltat = Some(v.parse::<f64>().map_err(|_| {
                CliError::from("Invalid deltat value: expected floating point number")
            })?);
            Ok(())
        }),
    },
    OptionSpec {
        name: "samples",
        kind: OptKind::Value(|value, params| {
            let v = required_value("samples", value)?;
            let samples = v
                .parse::<usize>()
                .map_err(|_| CliError::from(format!("Invalid samples value: {}", v)))?;
            if samples == 0 {
                return Err("Option --samples must be positive".into());
            }
            params.check.samples = samples;
            Ok(())
        }),
    },
    OptionSpec {
        name: "seed",
        kind: OptKind::Value(|value, params| {
            let v = required_value("seed", value)?;
            params.check.seed = Some(
                v.parse::<u64>()
                    .map_err(|_| CliError::from(format!("Invalid seed value: {}", v)))?,
            );
            Ok(())
        }),
    },
    OptionSpec {
        name: "from",
        kind: OptKind::Value(|value, params| {
            let v = required_value("from", value)?;
            params.check.from = data::parse_date(v)?;
            Ok(())
        }),
    },
    OptionSpec {
        name: "to",
        kind: OptKind::Value(|value, params| {
            let v = required_value("to", value)?;
            params.check.to = data::parse_date(v)?;
            Ok(())
        }),
    },
    OptionSpec {
        name: "headers",
        kind: OptKind::Flag(|_, params| {
            params.output.headers = true;
            Ok(())
        }),
    },
    OptionSpec {
        name: "no-headers",
        kind: OptKind::Flag(|_, params| {
            params.output.headers = false;
            Ok(())
        }),
    },
    OptionSpec {
        name: "show-inputs",
        kind: OptKind::Flag(|_, params| {
            params.output.show_inputs = Some(true);
            Ok(())
        }),
    },
    OptionSpec {
        name: "no-show-inputs",
        kind: OptKind::Flag(|_, params| {
            params.output.show_inputs = Some(false);
            Ok(())
        }),
    },
    OptionSpec {
        name: "radians",
        kind: OptKind::Flag(|_, params| {
            params.output.radians = true;
            Ok(())
        }),
    },
    OptionSpec {
        name: "compare",
        kind: OptKind::Flag(|_, params| {
            params.compare = true;
            Ok(())
        }),
    },
    OptionSpec {
        name: "no-progress",
        kind: OptKind::Flag(|_, params| {
            params.check.progress = false;
            Ok(())
        }),
    },
    OptionSpec {
        name: "perf",
        kind: OptKind::Flag(|_, params| {
            params.perf = true;
            Ok(())
        }),
    },
    OptionSpec {
        name: "help",
        kind: OptKind::Flag(|_, _| Err(CliError::Exit(get_help_text()))),
    },
    OptionSpec {
        name: "version",
        kind: OptKind::Flag(|_, _| Err(CliError::Exit(get_version_text()))),
    },
];

pub fn parse_cli(args: Vec<String>) -> CliResult<(DataSource, Command, Parameters)> {
    if args.len() < 2 {
        return Err(CliError::Exit(
            "Usage: sunpos [OPTIONS] <lat> <lon> <dateTime> position | sunpos [OPTIONS] check"
                .to_string(),
        ));
    }

    let mut params = Parameters::default();
    let mut positional = Vec::new();
    let mut applied_options: HashSet<&'static str> = HashSet::new();

    for arg in args.into_iter().skip(1) {
        if let Some(stripped) = arg.strip_prefix("--") {
            let (name, value) = stripped
                .split_once('=')
                .map(|(n, v)| (n, Some(v)))
                .unwrap_or((stripped, None));
            apply_option(name, value, &mut params, &mut applied_options)?;
        } else {
            positional.push(arg);
        }
    }

    if let Some(first) = positional.first()
        && first == "help"
    {
        let message = positional
            .get(1)
            .map(|command| get_command_help(command))
            .unwrap_or_else(get_help_text);
        return Err(CliError::Exit(message));
    }

    let (command, data_source) = parse_positional_args(&positional)?;

    validate_command_options(command, &params, &applied_options)?;

    if params.output.show_inputs.is_none() {
        params.output.show_inputs = Some(data_source.is_range());
    }

    Ok((data_source, command, params))
}

fn parse_f64(label: &str, value: &str) -> CliResult<f64> {
    value
        .parse::<f64>()
        .map_err(|_| CliError::from(format!("Invalid {}: {}", label, value)))
}

fn apply_option(
    name: &str,
    value: Option<&str>,
    params: &mut Parameters,
    applied: &mut HashSet<&'static str>,
) -> CliResult<()> {
    let Some(spec) = OPTION_SPECS.iter().find(|s| s.name == name) else {
        return Err(format!("Unknown option: --{}", name).into());
    };

    match spec.kind {
        OptKind::Value(handler) => {
            if applied.contains(spec.name) {
                return Err(format!("Option --{} cannot be used multiple times", spec.name).into());
            }
            let val = required_value(spec.name, value)?;
            handler(Some(val), params)?;
        }
        OptKind::Flag(handler) => {
            if value.is_some() {
                return Err(format!("Option --{} does not take a value", spec.name).into());
            }
            handler(None, params)?;
        }
    }

    applied.insert(spec.name);
    Ok(())
}

fn required_value<'a>(flag: &'static str, value: Option<&'a str>) -> CliResult<&'a str> {
    value.ok_or_else(|| CliError::from(format!("Option --{} requires a value", flag)))
}

fn parse_location_args(lat_str: &str, lon_str: &str) -> CliResult<LocationSource> {
    let lat_range = match parse_range(lat_str)? {
        Some(range) => Some(data::validate_latitude_range(range).map_err(CliError::from)?),
        None => None,
    };
    let lon_range = match parse_range(lon_str)? {
        Some(range) => Some(data::validate_longitude_range(range).map_err(CliError::from)?),
        None => None,
    };

    let single_lat = || -> CliResult<f64> {
        let value = parse_f64("latitude", lat_str)?;
        data::validate_latitude(value).map_err(CliError::from)
    };
    let single_lon = || -> CliResult<f64> {
        let value = parse_f64("longitude", lon_str)?;
        data::validate_longitude(value).map_err(CliError::from)
    };

    match (lat_range, lon_range) {
        (Some(lat), Some(lon)) => Ok(LocationSource::Range { lat, lon }),
        (Some(lat), None) => {
            let lon = single_lon()?;
            Ok(LocationSource::Range {
                lat,
                lon: (lon, lon, 0.0),
            })
        }
        (None, Some(lon)) => {
            let lat = single_lat()?;
            Ok(LocationSource::Range {
                lat: (lat, lat, 0.0),
                lon,
            })
        }
        (None, None) => Ok(LocationSource::Single(single_lat()?, single_lon()?)),
    }
}

fn parse_positional_args(positional_args: &[String]) -> CliResult<(Command, DataSource)> {
    if positional_args.is_empty() {
        return Err("Need a command: position or check".into());
    }

    let command_index = positional_args
        .iter()
        .position(|arg| arg == "position" || arg == "check")
        .ok_or("No command found".to_string())?;

    let command = match positional_args[command_index].as_str() {
        "position" => Command::Position,
        _ => Command::Check,
    };

    if command_index + 1 < positional_args.len() {
        return Err(format!(
            "Unexpected argument after command: {}",
            positional_args[command_index + 1]
        )
        .into());
    }

    let data_args = &positional_args[..command_index];

    match command {
        Command::Check if !data_args.is_empty() => {
            Err("Command check does not take positional arguments".into())
        }
        Command::Check => Ok((command, DataSource::Sampled)),
        Command::Position => match data_args {
            [lat, lon, time] => {
                let location = parse_location_args(lat, lon)?;
                let time = parse_time_arg(time)?;
                Ok((command, DataSource::Points(location, time)))
            }
            [] => Err("Need latitude, longitude and dateTime before position".into()),
            _ if data_args.len() > 3 => Err("Too many arguments".into()),
            _ => Err("Need latitude, longitude and dateTime before position".into()),
        },
    }
}

fn parse_time_arg(time_str: &str) -> CliResult<TimeSource> {
    if time_str == "now" {
        return Ok(TimeSource::Now);
    }

    data::parse_datetime_string(time_str).map_err(CliError::from)?;
    Ok(TimeSource::Single(time_str.to_string()))
}

fn parse_range(s: &str) -> Result<Option<(f64, f64, f64)>, CliError> {
    let Some((start_str, rest)) = s.split_once(':') else {
        return Ok(None);
    };
    let Some((end_str, step_str)) = rest.split_once(':') else {
        return Err(format!("Range must be start:end:step, got: {}", s).into());
    };

    let (start, end, step) = (
        start_str
            .parse::<f64>()
            .map_err(|_| CliError::from(format!("Invalid range start: {}", start_str)))?,
        end_str
            .parse::<f64>()
            .map_err(|_| CliError::from(format!("Invalid range end: {}", end_str)))?,
        step_str
            .parse::<f64>()
            .map_err(|_| CliError::from(format!("Invalid range step: {}", step_str)))?,
    );

    if step <= 0.0 {
        return Err("Range step must be positive".into());
    }
    if end < start {
        return Err(format!("Range end {} is before start {}", end, start).into());
    }

    Ok(Some((start, end, step)))
}

fn get_version_text() -> String {
    format!(
        "sunpos {}\n Build: {} ({})\n Built: {}\n Features: {}",
        env!("CARGO_PKG_VERSION"),
        env!("BUILD_PROFILE"),
        env!("BUILD_TARGET"),
        env!("BUILD_DATE"),
        env!("BUILD_FEATURES")
    )
}

fn validate_command_options(
    command: Command,
    params: &Parameters,
    applied: &HashSet<&'static str>,
) -> CliResult<()> {
    let (invalid, name) = match command {
        Command::Position => (CHECK_ONLY, "position"),
        Command::Check => (POSITION_ONLY, "check"),
    };

    if let Some(option) = invalid.iter().find(|opt| applied.contains(*opt)) {
        return Err(format!("Option --{} not valid for {} command", option, name).into());
    }

    if command == Command::Position && applied.contains("deltat") && !params.compare {
        return Err("Option --deltat requires --compare for position command".into());
    }

    if command == Command::Check && params.check.from > params.check.to {
        return Err(format!(
            "Option --from ({}) must not be after --to ({})",
            params.check.from, params.check.to
        )
        .into());
    }

    Ok(())
}

fn get_help_text() -> String {
    let defaults = Parameters::default();
    let formats = OutputFormat::all().join(", ");
    format!(
        r#"sunpos {}
Calculates low-precision solar coordinates and validates them against SPA.

Usage:
  sunpos [OPTIONS] <latitude> <longitude> <dateTime> position
  sunpos [OPTIONS] check

Examples:
  sunpos 52.0 13.4 2024-06-21 position
  sunpos 50:55:1 10:15:1 2024-06-21T00:00:00Z position --format=csv
  sunpos 52.0 13.4 1718928000000 position --compare
  sunpos check --samples=5000 --seed=42

Arguments:
  <latitude>         Latitude in decimal degrees (-90 to +90), or a range
                     start:end:step such as 50:55:0.5.
  <longitude>        Longitude in decimal degrees (-180 to +180, east positive),
                     or a range start:end:step.
  <dateTime>         Instant to evaluate:
                       2024-06-21T12:00:00+02:00  RFC 3339 with offset
                       2024-06-21T12:00:00        date and time (UTC)
                       2024-06-21 12:00           date and time (UTC)
                       2024-06-21                 midnight UTC
                       1718928000000              Unix epoch milliseconds
                       now                        current time

Options:
  --format=<format>     Output format: {}. Default: {}
  --[no-]headers        Include headers in CSV output. Default: {}
  --perf                Print performance statistics to stderr.
  --help                Show this help message and exit.
  --version             Print version information and exit.

Commands:
  position              Calculate solar azimuth and altitude.
  check                 Compare against SPA at random times and locations.

Run 'sunpos help <command>' for command-specific options.
"#,
        env!("CARGO_PKG_VERSION"),
        formats,
        defaults.output.format,
        defaults.output.headers
    )
}

fn get_command_help(command: &str) -> String {
    let defaults = Parameters::default();
    match command {
        "position" => r#"Usage:
  sunpos [OPTIONS] <latitude> <longitude> <dateTime> position

Calculates solar azimuth (clockwise from north) and altitude. The sidereal
time term follows the low-precision formula, which tracks the sun closely at
00:00 UTC only.

Options:
  --radians                 Print angles in radians instead of degrees.
  --[no-]show-inputs        Include latitude and longitude in output.
                            Auto-enabled for ranges.
  --compare                 Also compute the SPA reference and the error.
  --deltat=<seconds>        Delta T for --compare. Default: estimated.

Examples:
  sunpos 52.0 13.4 2024-06-21 position
  sunpos 52.0 13.4 2024-06-21 position --compare --format=json
  sunpos 0:60:10 0 2024-03-20 position --radians
"#
        .to_string(),
        "check" => format!(
            r#"Usage:
  sunpos [OPTIONS] check

Draws random whole UTC days and random locations, evaluates the formula and
SPA for each, and reports mean and maximum errors in degrees.

Options:
  --samples=<n>             Number of random samples. Default: {}
  --seed=<n>                Random seed. Default: random, reported in output.
  --from=<YYYY-MM-DD>       First day of the sample window. Default: {}
  --to=<YYYY-MM-DD>         Last day of the sample window. Default: {}
  --deltat=<seconds>        Delta T for the reference. Default: estimated.
  --no-progress             Do not show a progress bar.

Examples:
  sunpos check
  sunpos check --samples=10000 --seed=7 --format=json
  sunpos check --from=2024-01-01 --to=2024-12-31
"#,
            defaults.check.samples, defaults.check.from, defaults.check.to
        ),
        _ => format!(
            "Unknown command: {}\n\nRun 'sunpos --help' for usage.",
            command
        ),
    }
}
