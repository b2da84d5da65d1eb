use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Utc};

enum ParsedDateTime {
    Now,
    Fixed(DateTime<FixedOffset>),
    Naive(NaiveDateTime),
    DateOnly(NaiveDate),
    EpochMillis(i64),
}

fn parse_datetime_input(dt_str: &str) -> Result<ParsedDateTime, String> {
    if dt_str == "now" {
        return Ok(ParsedDateTime::Now);
    }

    if let Ok(millis) = dt_str.parse::<i64>() {
        return Ok(ParsedDateTime::EpochMillis(millis));
    }

    if dt_str.contains('T') {
        if let Ok(fixed_dt) = DateTime::parse_from_rfc3339(dt_str) {
            return Ok(ParsedDateTime::Fixed(fixed_dt));
        }

        let naive_dt = NaiveDateTime::parse_from_str(dt_str, "%Y-%m-%dT%H:%M:%S")
            .or_else(|_| NaiveDateTime::parse_from_str(dt_str, "%Y-%m-%dT%H:%M:%S%.f"))
            .or_else(|_| NaiveDateTime::parse_from_str(dt_str, "%Y-%m-%dT%H:%M"))
            .map_err(|e| format!("Failed to parse datetime '{}': {}", dt_str, e))?;
        return Ok(ParsedDateTime::Naive(naive_dt));
    }

    if dt_str.contains(' ') && dt_str.contains(':') {
        if let Ok(fixed_dt) = DateTime::parse_from_str(dt_str, "%Y-%m-%d %H:%M:%S%:z") {
            return Ok(ParsedDateTime::Fixed(fixed_dt));
        }

        let naive_dt = NaiveDateTime::parse_from_str(dt_str, "%Y-%m-%d %H:%M:%S")
            .or_else(|_| NaiveDateTime::parse_from_str(dt_str, "%Y-%m-%d %H:%M:%S%.f"))
            .or_else(|_| NaiveDateTime::parse_from_str(dt_str, "%Y-%m-%d %H:%M"))
            .map_err(|e| format!("Failed to parse datetime '{}': {}", dt_str, e))?;
        return Ok(ParsedDateTime::Naive(naive_dt));
    }

    parse_date(dt_str).map(ParsedDateTime::DateOnly)
}

/// Parse a timestamp argument. Inputs without an offset are taken as UTC.
pub fn parse_datetime_string(dt_str: &str) -> Result<DateTime<FixedOffset>, String> {
    match parse_datetime_input(dt_str.trim())? {
        ParsedDateTime::Now => Ok(Utc::now().fixed_offset()),
        ParsedDateTime::Fixed(dt) => Ok(dt),
        ParsedDateTime::Naive(naive_dt) => Ok(naive_dt.and_utc().fixed_offset()),
        ParsedDateTime::DateOnly(date) => {
            let naive_dt = date
                .and_hms_opt(0, 0, 0)
                .expect("Midnight time creation cannot fail");
            Ok(naive_dt.and_utc().fixed_offset())
        }
        ParsedDateTime::EpochMillis(millis) => DateTime::<Utc>::from_timestamp_millis(millis)
            .map(|dt| dt.fixed_offset())
            .ok_or_else(|| format!("Invalid epoch milliseconds: {}", millis)),
    }
}

pub fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| format!("Failed to parse date '{}': {}", s, e))
}
