//! Region lookup from GeoJSON boundary files.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use geo::MultiPolygon;
use geojson::{FeatureCollection, GeoJson, Value};
use tracing::{debug, info};

use super::types::{Region, RegionError};

/// Default feature property holding the region name.
pub const DEFAULT_NAME_PROPERTY: &str = "name";

/// Trait for resolving a named region to its boundary polygon.
///
/// This abstraction allows the batch orchestrator to be tested against an
/// in-memory source instead of a boundaries file on disk.
pub trait RegionSource {
    /// Resolves a region by name.
    ///
    /// # Errors
    ///
    /// Returns [`RegionError::NotFound`] for unknown names, or another
    /// `RegionError` if the stored geometry is unusable.
    fn get_region(&self, name: &str) -> Result<Region, RegionError>;
}

/// Region source backed by a GeoJSON `FeatureCollection` file.
///
/// All features are indexed at load time by the configured name property.
/// Features whose geometry is neither `Polygon` nor `MultiPolygon`, or that
/// lack the name property, are skipped with a debug log rather than failing
/// the whole file: boundary exports routinely carry point features
/// (capitals, labels) alongside the polygons of interest.
pub struct GeoJsonRegionSource {
    boundaries: HashMap<String, MultiPolygon<f64>>,
}

impl GeoJsonRegionSource {
    /// Loads a boundaries file and indexes its features by `name_property`.
    ///
    /// # Errors
    ///
    /// Returns [`RegionError::Io`] if the file cannot be read and
    /// [`RegionError::Parse`] if it is not a GeoJSON feature collection.
    pub fn from_file(path: &Path, name_property: &str) -> Result<Self, RegionError> {
        let contents = fs::read_to_string(path).map_err(|e| RegionError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        let source = Self::from_geojson(&contents, name_property).map_err(|e| match e {
            RegionError::Parse { reason, .. } => RegionError::Parse {
                path: path.display().to_string(),
                reason,
            },
            other => other,
        })?;
        info!(
            path = %path.display(),
            regions = source.len(),
            "Loaded region boundaries"
        );
        Ok(source)
    }

    /// Parses a GeoJSON string and indexes its features by `name_property`.
    pub fn from_geojson(contents: &str, name_property: &str) -> Result<Self, RegionError> {
        let geojson: GeoJson = contents.parse().map_err(|e: geojson::Error| {
            RegionError::Parse {
                path: String::from("<inline>"),
                reason: e.to_string(),
            }
        })?;
        let collection =
            FeatureCollection::try_from(geojson).map_err(|e| RegionError::Parse {
                path: String::from("<inline>"),
                reason: format!("not a feature collection: {}", e),
            })?;

        let mut boundaries: HashMap<String, MultiPolygon<f64>> = HashMap::new();
        for feature in collection.features {
            let name = match feature
                .property(name_property)
                .and_then(|v| v.as_str())
            {
                Some(name) => name.to_string(),
                None => {
                    debug!(property = name_property, "Skipping feature without name");
                    continue;
                }
            };

            let geometry = match feature.geometry {
                Some(g) => g,
                None => {
                    debug!(region = %name, "Skipping feature without geometry");
                    continue;
                }
            };

            let polygons = match geometry.value {
                Value::Polygon(_) => {
                    let polygon: geo::Polygon<f64> =
                        geometry.value.try_into().map_err(|e: geojson::Error| {
                            RegionError::Parse {
                                path: String::from("<inline>"),
                                reason: format!("bad polygon for '{}': {}", name, e),
                            }
                        })?;
                    MultiPolygon(vec![polygon])
                }
                Value::MultiPolygon(_) => {
                    geometry.value.try_into().map_err(|e: geojson::Error| {
                        RegionError::Parse {
                            path: String::from("<inline>"),
                            reason: format!("bad multi-polygon for '{}': {}", name, e),
                        }
                    })?
                }
                _ => {
                    debug!(region = %name, "Skipping non-polygon feature");
                    continue;
                }
            };

            // Same name across several features: accumulate the parts so
            // containment stays union-based.
            boundaries
                .entry(name)
                .and_modify(|existing| existing.0.extend(polygons.0.clone()))
                .or_insert(polygons);
        }

        Ok(Self { boundaries })
    }

    /// Number of named regions in the index.
    pub fn len(&self) -> usize {
        self.boundaries.len()
    }

    /// Whether the index holds no regions at all.
    pub fn is_empty(&self) -> bool {
        self.boundaries.is_empty()
    }

    /// Names of all indexed regions, unordered.
    pub fn region_names(&self) -> impl Iterator<Item = &str> {
        self.boundaries.keys().map(String::as_str)
    }
}

impl RegionSource for GeoJsonRegionSource {
    fn get_region(&self, name: &str) -> Result<Region, RegionError> {
        let boundary = self
            .boundaries
            .get(name)
            .ok_or_else(|| RegionError::NotFound(name.to_string()))?;
        Region::new(name, boundary.clone())
    }
}
