use super::time_utils::parse_datetime_string;
use super::types::{CoordTimeStream, LocationSource, LocationStream, TimeSource};
use chrono::{DateTime, FixedOffset};
use std::sync::Arc;

fn coord_range_iter(start: f64, end: f64, step: f64) -> Box<dyn Iterator<Item = f64>> {
    if step == 0.0 || start == end {
        Box::new(std::iter::once(start))
    } else {
        // Counting steps keeps every value inside [start, end]
        let count = ((end - start) / step + 1e-9).floor() as usize + 1;
        Box::new((0..count).map(move |i| (start + i as f64 * step).min(end)))
    }
}

pub fn expand_location_source(source: LocationSource) -> LocationStream {
    match source {
        LocationSource::Single(lat, lon) => Box::new(std::iter::once((lat, lon))),
        LocationSource::Range { lat, lon } => {
            // Longitudes are reused for every latitude row
            let lon_coords = Arc::new(coord_range_iter(lon.0, lon.1, lon.2).collect::<Vec<f64>>());
            Box::new(
                coord_range_iter(lat.0, lat.1, lat.2).flat_map(move |lat| {
                    let lon_coords = Arc::clone(&lon_coords);
                    (0..lon_coords.len()).map(move |idx| (lat, lon_coords[idx]))
                }),
            )
        }
    }
}

pub fn resolve_time_source(source: &TimeSource) -> Result<DateTime<FixedOffset>, String> {
    match source {
        TimeSource::Single(dt_str) => parse_datetime_string(dt_str),
        TimeSource::Now => parse_datetime_string("now"),
    }
}

pub fn expand_points(
    location: LocationSource,
    time: &TimeSource,
) -> Result<CoordTimeStream, String> {
    let dt = resolve_time_source(time)?;
    Ok(Box::new(
        expand_location_source(location).map(move |(lat, lon)| (lat, lon, dt)),
    ))
}
