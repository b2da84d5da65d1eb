use chrono::{DateTime, FixedOffset};

#[derive(Debug, Clone, PartialEq)]
pub enum LocationSource {
    Single(f64, f64),
    Range {
        lat: (f64, f64, f64),
        lon: (f64, f64, f64),
    },
}

impl LocationSource {
    /// Whether latitude and longitude take more than one value.
    pub fn varies(&self) -> (bool, bool) {
        match self {
            LocationSource::Single(_, _) => (false, false),
            LocationSource::Range { lat, lon } => (lat.0 != lat.1, lon.0 != lon.1),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TimeSource {
    Single(String),
    Now,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DataSource {
    /// Explicit observer grid at one instant (`position`).
    Points(LocationSource, TimeSource),
    /// Random samples drawn by the validator (`check`).
    Sampled,
}

impl DataSource {
    pub fn is_range(&self) -> bool {
        matches!(self, DataSource::Points(LocationSource::Range { .. }, _))
    }
}

pub type CoordTime = (f64, f64, DateTime<FixedOffset>);
pub type CoordTimeStream = Box<dyn Iterator<Item = CoordTime>>;

pub type LocationStream = Box<dyn Iterator<Item = (f64, f64)>>;
