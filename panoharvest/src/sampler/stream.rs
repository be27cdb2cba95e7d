//! Lazily-evaluated candidate point stream.

use rand::Rng;

use super::sample_points;
use crate::coord::GeoPoint;
use crate::region::Region;

/// Restartable stream of candidate points for one region.
///
/// Yields candidates one at a time in sampler order. When the current batch
/// is exhausted a fresh batch of `batch_size` bounding-box samples is drawn;
/// the batch size never shrinks as consumers approach their quota. The
/// stream ends (returns `None`) only after `max_empty_batches` consecutive
/// batches survive rejection with zero points, which bounds the work spent
/// on boundaries whose area is negligible within their bounding box.
#[derive(Debug)]
pub struct CandidateStream<'a, R: Rng> {
    region: &'a Region,
    batch_size: usize,
    max_empty_batches: u32,
    rng: &'a mut R,
    buffer: std::vec::IntoIter<GeoPoint>,
    batches_drawn: u64,
}

impl<'a, R: Rng> CandidateStream<'a, R> {
    /// Creates a stream over `region` drawing batches of `batch_size`.
    pub fn new(
        region: &'a Region,
        batch_size: usize,
        max_empty_batches: u32,
        rng: &'a mut R,
    ) -> Self {
        Self {
            region,
            batch_size,
            max_empty_batches,
            rng,
            buffer: Vec::new().into_iter(),
            batches_drawn: 0,
        }
    }

    /// Number of batches drawn so far, including empty ones.
    pub fn batches_drawn(&self) -> u64 {
        self.batches_drawn
    }
}

impl<R: Rng> Iterator for CandidateStream<'_, R> {
    type Item = GeoPoint;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(point) = self.buffer.next() {
            return Some(point);
        }

        for _ in 0..self.max_empty_batches {
            let batch = sample_points(self.region, self.batch_size, self.rng);
            self.batches_drawn += 1;
            if !batch.is_empty() {
                self.buffer = batch.into_iter();
                return self.buffer.next();
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{polygon, MultiPolygon, Point};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn unit_square_region() -> Region {
        Region::new(
            "square",
            MultiPolygon(vec![polygon![
                (x: 0.0, y: 0.0),
                (x: 1.0, y: 0.0),
                (x: 1.0, y: 1.0),
                (x: 0.0, y: 1.0),
            ]]),
        )
        .unwrap()
    }

    fn sliver_region() -> Region {
        Region::new(
            "sliver",
            MultiPolygon(vec![polygon![
                (x: 0.0, y: 0.0),
                (x: 1.0, y: 1.0),
                (x: 2.0, y: 2.0),
            ]]),
        )
        .unwrap()
    }

    #[test]
    fn test_yields_points_inside_region() {
        let region = unit_square_region();
        let mut rng = StdRng::seed_from_u64(5);
        let mut stream = CandidateStream::new(&region, 100, 4, &mut rng);

        for _ in 0..250 {
            let p = stream.next().expect("square should keep yielding");
            assert!(region.contains(&Point::new(p.lon, p.lat)));
        }
    }

    #[test]
    fn test_regenerates_batches_on_demand() {
        let region = unit_square_region();
        let mut rng = StdRng::seed_from_u64(5);
        let mut stream = CandidateStream::new(&region, 10, 4, &mut rng);

        // Pulling well past one batch forces several refills.
        let drawn: Vec<_> = stream.by_ref().take(35).collect();
        assert_eq!(drawn.len(), 35);
        assert!(stream.batches_drawn() >= 4);
    }

    #[test]
    fn test_dries_up_on_zero_area_boundary() {
        let region = sliver_region();
        let mut rng = StdRng::seed_from_u64(5);
        let mut stream = CandidateStream::new(&region, 50, 3, &mut rng);

        assert!(stream.next().is_none());
        assert_eq!(stream.batches_drawn(), 3);
    }

    #[test]
    fn test_batch_size_is_fixed() {
        let region = unit_square_region();
        let mut rng = StdRng::seed_from_u64(11);
        let mut stream = CandidateStream::new(&region, 100, 4, &mut rng);

        // Drain far more than one batch; batches stay full-size, so the
        // number drawn stays well below the pull count.
        let pulled = stream.by_ref().take(500).count();
        assert_eq!(pulled, 500);
        assert!(stream.batches_drawn() <= 20);
    }
}
