//! Uniform point sampling inside region boundaries.
//!
//! Sampling is rejection-based: candidates are drawn uniformly over the
//! region's bounding rectangle and those outside the boundary polygon are
//! discarded. This is unbiased for arbitrarily-shaped polygons without
//! needing a triangulation-based exact sampler; the cost is an acceptance
//! rate equal to the polygon's fill ratio within its bounding box, which
//! callers must tolerate.
//!
//! Two interfaces are provided:
//!
//! - [`sample_points`] draws one fixed-size batch and returns the survivors.
//! - [`CandidateStream`] wraps batch drawing in a lazily-evaluated,
//!   restartable iterator that yields candidates one at a time, regenerating
//!   a fresh batch whenever the current one is exhausted.

mod stream;

pub use stream::CandidateStream;

use geo::Point;
use rand::Rng;

use crate::coord::GeoPoint;
use crate::region::Region;

/// Default number of bounding-box samples per batch.
pub const DEFAULT_BATCH_SIZE: usize = 5000;

/// Draws `n` uniform points in the region's bounding rectangle and returns
/// those that fall inside the boundary polygon.
///
/// The returned length is at most `n` and may be zero when the boundary's
/// area is negligible relative to its bounding box; that is a valid outcome,
/// not an error. Points are returned in draw order.
pub fn sample_points<R: Rng + ?Sized>(region: &Region, n: usize, rng: &mut R) -> Vec<GeoPoint> {
    let bbox = region.bounding_rect();
    let (min, max) = (bbox.min(), bbox.max());

    let mut points = Vec::new();
    for _ in 0..n {
        // Inclusive ranges so a degenerate (zero-extent) axis cannot panic.
        let lon = rng.gen_range(min.x..=max.x);
        let lat = rng.gen_range(min.y..=max.y);
        if region.contains(&Point::new(lon, lat)) {
            points.push(GeoPoint { lat, lon });
        }
    }
    points
}
