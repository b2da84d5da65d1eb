//! Low-precision solar position with a reference cross-check.
//!
//! [`sun_position`] maps a Unix epoch in milliseconds and an observer location
//! to the sun's azimuth and altitude in radians. The [`validation`] module
//! samples random points and compares the results against NREL SPA.

pub mod position;
pub mod validation;

pub use position::{SunPosition, sun_position, sun_position_at};
