use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Position,
    Check,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Csv,
    Json,
}

impl OutputFormat {
    pub fn all() -> [&'static str; 3] {
        ["text", "csv", "json"]
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!(
                "Invalid format: {}. Supported formats: {}",
                s,
                Self::all().join(", ")
            )),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Text => "text",
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone)]
pub struct OutputOptions {
    pub format: OutputFormat,
    pub headers: bool,
    pub show_inputs: Option<bool>,
    pub radians: bool,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            headers: true,
            show_inputs: None,
            radians: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CheckOptions {
    pub samples: usize,
    pub seed: Option<u64>,
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub progress: bool,
}

impl Default for CheckOptions {
    fn default() -> Self {
        let window = sunpos::validation::SampleWindow::default();
        Self {
            samples: 1000,
            seed: None,
            from: window.start(),
            to: window.end(),
            progress: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Parameters {
    /// None means estimate from the date.
    pub deltat: Option<f64>,
    pub output: OutputOptions,
    pub check: CheckOptions,
    pub compare: bool,
    pub perf: bool,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            deltat: None,
            output: OutputOptions::default(),
            check: CheckOptions::default(),
            compare: false,
            perf: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parse_is_case_insensitive() {
        assert_eq!("CSV".parse::<OutputFormat>(), Ok(OutputFormat::Csv));
        assert_eq!("json".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert!("xml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_check_defaults_cover_2020s() {
        let check = CheckOptions::default();
        assert_eq!(check.samples, 1000);
        assert_eq!(check.from.to_string(), "2020-01-01");
        assert_eq!(check.to.to_string(), "2030-12-31");
    }
}
