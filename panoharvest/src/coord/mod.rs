//! Geographic coordinate module
//!
//! Provides the [`GeoPoint`] primitive used throughout the acquisition
//! pipeline, with range validation for latitude and longitude.

mod types;

pub use types::{CoordError, GeoPoint, MAX_LAT, MAX_LON, MIN_LAT, MIN_LON};
