//! Region boundary module
//!
//! A [`Region`] is a named geographic area with a (possibly multi-part)
//! polygon boundary and a cached bounding rectangle. Regions are immutable
//! once loaded and are resolved by name through a [`RegionSource`].
//!
//! The shipped source is [`GeoJsonRegionSource`], which reads a GeoJSON
//! `FeatureCollection` of administrative boundaries (for example a Natural
//! Earth countries export) and indexes features by a name property.

mod source;
mod types;

pub use source::{GeoJsonRegionSource, RegionSource, DEFAULT_NAME_PROPERTY};
pub use types::{Region, RegionError};
