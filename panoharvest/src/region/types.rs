//! Region value type.

use geo::{BoundingRect, Contains, MultiPolygon, Point, Rect};
use thiserror::Error;

/// Errors that can occur while loading or constructing regions.
///
/// All of these are input errors: they fail fast and are never retried.
#[derive(Debug, Error)]
pub enum RegionError {
    /// Boundaries file could not be read
    #[error("Failed to read boundaries file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Boundaries file is not valid GeoJSON
    #[error("Invalid GeoJSON in '{path}': {reason}")]
    Parse { path: String, reason: String },

    /// No feature with the requested name exists
    #[error("Region '{0}' not found in boundaries file")]
    NotFound(String),

    /// Feature exists but carries no polygon geometry
    #[error("Region '{0}' has no polygon geometry")]
    MissingGeometry(String),

    /// Boundary polygon contains no rings at all
    #[error("Region '{0}' has an empty boundary polygon")]
    EmptyBoundary(String),
}

/// A named geographic area with a multi-polygon boundary.
///
/// The bounding rectangle is computed once at construction and reused by the
/// point sampler for every batch. Containment is union-based: a point is
/// inside the region if it lies in any constituent sub-polygon.
#[derive(Debug, Clone)]
pub struct Region {
    name: String,
    boundary: MultiPolygon<f64>,
    bbox: Rect<f64>,
}

impl Region {
    /// Creates a region from a name and boundary.
    ///
    /// # Errors
    ///
    /// Returns [`RegionError::EmptyBoundary`] if the boundary contains no
    /// coordinates. A degenerate boundary with negligible area is accepted;
    /// the sampler tolerates it (see the acquisition loop's stall handling).
    pub fn new(name: impl Into<String>, boundary: MultiPolygon<f64>) -> Result<Self, RegionError> {
        let name = name.into();
        let bbox = match boundary.bounding_rect() {
            Some(rect) => rect,
            None => return Err(RegionError::EmptyBoundary(name)),
        };
        Ok(Self {
            name,
            boundary,
            bbox,
        })
    }

    /// The region's name as it appears in the boundaries file.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The multi-polygon boundary in (longitude, latitude) axis order.
    pub fn boundary(&self) -> &MultiPolygon<f64> {
        &self.boundary
    }

    /// The boundary's axis-aligned bounding rectangle.
    pub fn bounding_rect(&self) -> Rect<f64> {
        self.bbox
    }

    /// Whether the point lies inside any sub-polygon of the boundary.
    pub fn contains(&self, point: &Point<f64>) -> bool {
        self.boundary.contains(point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{polygon, MultiPolygon};

    fn unit_square() -> MultiPolygon<f64> {
        MultiPolygon(vec![polygon![
            (x: 0.0, y: 0.0),
            (x: 1.0, y: 0.0),
            (x: 1.0, y: 1.0),
            (x: 0.0, y: 1.0),
        ]])
    }

    #[test]
    fn test_new_computes_bounding_rect() {
        let region = Region::new("square", unit_square()).unwrap();
        let rect = region.bounding_rect();
        assert_eq!(rect.min().x, 0.0);
        assert_eq!(rect.min().y, 0.0);
        assert_eq!(rect.max().x, 1.0);
        assert_eq!(rect.max().y, 1.0);
    }

    #[test]
    fn test_new_empty_boundary_is_error() {
        let result = Region::new("nowhere", MultiPolygon(vec![]));
        assert!(matches!(result, Err(RegionError::EmptyBoundary(_))));
    }

    #[test]
    fn test_contains_inside_and_outside() {
        let region = Region::new("square", unit_square()).unwrap();
        assert!(region.contains(&Point::new(0.5, 0.5)));
        assert!(!region.contains(&Point::new(1.5, 0.5)));
        assert!(!region.contains(&Point::new(-0.1, 0.5)));
    }

    #[test]
    fn test_contains_is_union_across_parts() {
        let two_parts = MultiPolygon(vec![
            polygon![
                (x: 0.0, y: 0.0),
                (x: 1.0, y: 0.0),
                (x: 1.0, y: 1.0),
                (x: 0.0, y: 1.0),
            ],
            polygon![
                (x: 10.0, y: 10.0),
                (x: 11.0, y: 10.0),
                (x: 11.0, y: 11.0),
                (x: 10.0, y: 11.0),
            ],
        ]);
        let region = Region::new("islands", two_parts).unwrap();
        assert!(region.contains(&Point::new(0.5, 0.5)));
        assert!(region.contains(&Point::new(10.5, 10.5)));
        // In the combined bounding box but in neither part.
        assert!(!region.contains(&Point::new(5.0, 5.0)));
    }

    #[test]
    fn test_bounding_rect_spans_all_parts() {
        let two_parts = MultiPolygon(vec![
            polygon![
                (x: 0.0, y: 0.0),
                (x: 1.0, y: 0.0),
                (x: 1.0, y: 1.0),
                (x: 0.0, y: 1.0),
            ],
            polygon![
                (x: 10.0, y: 10.0),
                (x: 11.0, y: 10.0),
                (x: 11.0, y: 11.0),
                (x: 10.0, y: 11.0),
            ],
        ]);
        let region = Region::new("islands", two_parts).unwrap();
        let rect = region.bounding_rect();
        assert_eq!(rect.min().x, 0.0);
        assert_eq!(rect.max().y, 11.0);
    }
}
