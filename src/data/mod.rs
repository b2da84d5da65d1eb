pub mod config;
pub mod expansion;
pub mod time_utils;
pub mod types;
pub mod validation;

pub use config::{Command, OutputFormat, Parameters};
pub use expansion::*;
pub use time_utils::{parse_date, parse_datetime_string};
pub use types::*;
pub use validation::*;
