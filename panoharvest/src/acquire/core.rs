//! Acquisition loop implementation.

use std::collections::HashSet;
use std::thread;
use std::time::{Duration, Instant};

use rand::Rng;
use tracing::{debug, info, trace, warn};

use super::config::{AcquireConfig, MAX_BACKOFF};
use super::error::AcquireError;
use super::record::PanoRecord;
use super::stats::AcquireStats;
use crate::lookup::{LookupOutcome, PanoLookup};
use crate::region::Region;
use crate::sampler::CandidateStream;

/// Result of a completed acquisition run: the accepted records in
/// acceptance order plus the run's counters.
#[derive(Debug)]
pub struct Acquisition {
    pub records: Vec<PanoRecord>,
    pub stats: AcquireStats,
}

/// Drives candidate sampling and validation for one region at a time.
///
/// The loop owns no per-region state between runs; the seen-set and result
/// list are created fresh for every [`run`](AcquisitionLoop::run) and
/// returned (or dropped) when it ends. Execution is strictly sequential:
/// one blocking lookup request at a time, candidates in sampler order.
///
/// # Example
///
/// ```ignore
/// use panoharvest::acquire::{AcquireConfig, AcquisitionLoop};
/// use panoharvest::lookup::{ReqwestClient, StreetViewLookup};
///
/// let client = ReqwestClient::new()?;
/// let lookup = StreetViewLookup::new(client, api_key);
/// let acquisition = AcquisitionLoop::new(lookup, AcquireConfig::default())
///     .run(&region, 1000, &mut rand::thread_rng())?;
/// ```
pub struct AcquisitionLoop<L> {
    lookup: L,
    config: AcquireConfig,
}

impl<L: PanoLookup> AcquisitionLoop<L> {
    /// Creates a loop over the given lookup service.
    pub fn new(lookup: L, config: AcquireConfig) -> Self {
        Self { lookup, config }
    }

    /// Acquires exactly `quota` unique panorama records for `region`.
    ///
    /// Pulls candidates from fresh fixed-size sampler batches and submits
    /// each to the lookup service. The instant the result list reaches the
    /// quota the run returns, even mid-batch; remaining candidates are
    /// never submitted.
    ///
    /// # Errors
    ///
    /// - [`AcquireError::InvalidQuota`] for a zero quota.
    /// - [`AcquireError::QuotaUnreachable`] when the stall ceiling passes
    ///   without an acceptance.
    /// - [`AcquireError::Lookup`] when the service refuses a request
    ///   outright.
    pub fn run<R: Rng>(
        &self,
        region: &Region,
        quota: usize,
        rng: &mut R,
    ) -> Result<Acquisition, AcquireError> {
        if quota == 0 {
            return Err(AcquireError::InvalidQuota);
        }

        info!(
            region = region.name(),
            quota,
            batch_size = self.config.batch_size,
            "Starting acquisition"
        );

        let mut seen: HashSet<String> = HashSet::new();
        let mut records: Vec<PanoRecord> = Vec::with_capacity(quota);
        let mut stats = AcquireStats::default();

        // Candidates since the last acceptance; duplicates and transient
        // errors count toward the stall ceiling just like NOT_FOUND.
        let mut barren: usize = 0;
        let mut consecutive_transient: u32 = 0;
        let mut last_request: Option<Instant> = None;

        let mut stream = CandidateStream::new(
            region,
            self.config.batch_size,
            self.config.max_empty_batches(),
            rng,
        );

        while records.len() < quota {
            let point = match stream.next() {
                Some(point) => point,
                // The sampler itself dried up: the boundary's area is
                // negligible within its bounding box.
                None => {
                    stats.batches_drawn = stream.batches_drawn();
                    return Err(AcquireError::QuotaUnreachable {
                        region: region.name().to_string(),
                        quota,
                        accepted: records.len(),
                        candidates_examined: stats.candidates_examined,
                    });
                }
            };

            self.pace(&mut last_request);
            stats.candidates_examined += 1;

            match self.lookup.lookup(&point, self.config.radius_m) {
                Ok(LookupOutcome::Found { lat, lon, pano_id }) => {
                    consecutive_transient = 0;
                    if seen.contains(&pano_id) {
                        stats.duplicates += 1;
                        barren += 1;
                        trace!(region = region.name(), pano_id = %pano_id, "Duplicate panorama");
                    } else {
                        seen.insert(pano_id.clone());
                        records.push(PanoRecord {
                            region: region.name().to_string(),
                            latitude: lat,
                            longitude: lon,
                            pano_id,
                        });
                        stats.accepted += 1;
                        barren = 0;
                        debug!(
                            region = region.name(),
                            accepted = records.len(),
                            quota,
                            "Accepted panorama"
                        );
                    }
                }
                Ok(LookupOutcome::NotFound) => {
                    consecutive_transient = 0;
                    stats.not_found += 1;
                    barren += 1;
                    trace!(region = region.name(), %point, "No panorama near candidate");
                }
                Err(e) if e.is_transient() => {
                    stats.transient_errors += 1;
                    barren += 1;
                    consecutive_transient += 1;
                    warn!(
                        region = region.name(),
                        %point,
                        error = %e,
                        "Transient lookup failure, skipping candidate"
                    );
                    self.backoff(consecutive_transient);
                }
                Err(e) => {
                    stats.batches_drawn = stream.batches_drawn();
                    return Err(AcquireError::Lookup(e));
                }
            }

            if barren >= self.config.stall_ceiling {
                stats.batches_drawn = stream.batches_drawn();
                return Err(AcquireError::QuotaUnreachable {
                    region: region.name().to_string(),
                    quota,
                    accepted: records.len(),
                    candidates_examined: stats.candidates_examined,
                });
            }
        }

        stats.batches_drawn = stream.batches_drawn();
        debug_assert_eq!(records.len(), seen.len());

        info!(
            region = region.name(),
            accepted = stats.accepted,
            not_found = stats.not_found,
            duplicates = stats.duplicates,
            transient_errors = stats.transient_errors,
            acceptance_rate = stats.acceptance_rate(),
            "Acquisition complete"
        );

        Ok(Acquisition { records, stats })
    }

    /// Enforces the minimum spacing between lookup requests.
    fn pace(&self, last_request: &mut Option<Instant>) {
        let interval = self.config.min_request_interval;
        if !interval.is_zero() {
            if let Some(prev) = *last_request {
                let elapsed = prev.elapsed();
                if elapsed < interval {
                    thread::sleep(interval - elapsed);
                }
            }
        }
        *last_request = Some(Instant::now());
    }

    /// Sleeps with exponential backoff after `streak` consecutive
    /// transient failures.
    fn backoff(&self, streak: u32) {
        let base = self.config.retry_base_delay;
        if base.is_zero() {
            return;
        }
        let exponent = streak.saturating_sub(1).min(6);
        let delay = base.saturating_mul(1u32 << exponent).min(MAX_BACKOFF);
        thread::sleep(delay);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::LookupError;
    use geo::{polygon, MultiPolygon};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

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

    fn test_config() -> AcquireConfig {
        AcquireConfig::default()
            .with_batch_size(50)
            .with_stall_ceiling(500)
            .with_retry_base_delay(Duration::ZERO)
    }

    /// Lookup that accepts every candidate with a fresh identifier.
    struct UniqueLookup {
        calls: AtomicUsize,
    }

    impl UniqueLookup {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl PanoLookup for UniqueLookup {
        fn lookup(
            &self,
            point: &crate::coord::GeoPoint,
            _radius_m: u32,
        ) -> Result<LookupOutcome, LookupError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(LookupOutcome::Found {
                lat: point.lat,
                lon: point.lon,
                pano_id: format!("pano-{}", n),
            })
        }
    }

    /// Lookup that replays a scripted sequence, repeating the final entry.
    struct ScriptedLookup {
        script: Mutex<VecDeque<Result<LookupOutcome, LookupError>>>,
        calls: AtomicUsize,
    }

    impl ScriptedLookup {
        fn new(script: Vec<Result<LookupOutcome, LookupError>>) -> Self {
            Self {
                script: Mutex::new(VecDeque::from(script)),
                calls: AtomicUsize::new(0),
            }
        }

        fn found(id: &str) -> Result<LookupOutcome, LookupError> {
            Ok(LookupOutcome::Found {
                lat: 0.5,
                lon: 0.5,
                pano_id: id.to_string(),
            })
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl PanoLookup for ScriptedLookup {
        fn lookup(
            &self,
            _point: &crate::coord::GeoPoint,
            _radius_m: u32,
        ) -> Result<LookupOutcome, LookupError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut script = self.script.lock().unwrap();
            if script.len() > 1 {
                script.pop_front().unwrap()
            } else {
                script.front().expect("empty script").clone()
            }
        }
    }

    #[test]
    fn test_meets_quota_with_distinct_ids() {
        let acquisition = AcquisitionLoop::new(UniqueLookup::new(), test_config())
            .run(&unit_square_region(), 10, &mut StdRng::seed_from_u64(1))
            .unwrap();

        assert_eq!(acquisition.records.len(), 10);
        let ids: HashSet<_> = acquisition.records.iter().map(|r| &r.pano_id).collect();
        assert_eq!(ids.len(), 10);
        assert_eq!(acquisition.stats.accepted, 10);
    }

    #[test]
    fn test_short_circuits_mid_batch() {
        // Batch size far above the quota: if the loop drained whole batches
        // the lookup would see 50 calls, not 5.
        let lookup = UniqueLookup::new();
        let acquisition = AcquisitionLoop::new(lookup, test_config())
            .run(&unit_square_region(), 5, &mut StdRng::seed_from_u64(1))
            .unwrap();

        assert_eq!(acquisition.records.len(), 5);
        assert_eq!(acquisition.stats.candidates_examined, 5);
    }

    #[test]
    fn test_duplicates_never_grow_result() {
        let lookup = ScriptedLookup::new(vec![
            ScriptedLookup::found("a"),
            ScriptedLookup::found("a"),
            ScriptedLookup::found("a"),
            ScriptedLookup::found("b"),
        ]);
        let acquisition = AcquisitionLoop::new(lookup, test_config())
            .run(&unit_square_region(), 2, &mut StdRng::seed_from_u64(2))
            .unwrap();

        let ids: Vec<_> = acquisition
            .records
            .iter()
            .map(|r| r.pano_id.as_str())
            .collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(acquisition.stats.duplicates, 2);
    }

    #[test]
    fn test_not_found_advances_to_next_candidate() {
        let lookup = ScriptedLookup::new(vec![
            Ok(LookupOutcome::NotFound),
            Ok(LookupOutcome::NotFound),
            ScriptedLookup::found("only"),
        ]);
        let acquisition = AcquisitionLoop::new(lookup, test_config())
            .run(&unit_square_region(), 1, &mut StdRng::seed_from_u64(3))
            .unwrap();

        assert_eq!(acquisition.records.len(), 1);
        assert_eq!(acquisition.stats.not_found, 2);
    }

    #[test]
    fn test_transient_error_is_skipped_not_fatal() {
        let lookup = ScriptedLookup::new(vec![
            Err(LookupError::Http("connection reset".to_string())),
            ScriptedLookup::found("after-error"),
        ]);
        let acquisition = AcquisitionLoop::new(lookup, test_config())
            .run(&unit_square_region(), 1, &mut StdRng::seed_from_u64(4))
            .unwrap();

        assert_eq!(acquisition.records.len(), 1);
        assert_eq!(acquisition.stats.transient_errors, 1);
    }

    #[test]
    fn test_canonical_coordinates_are_stored() {
        // Scripted lookups always report (0.5, 0.5) regardless of the
        // sampled candidate.
        let lookup = ScriptedLookup::new(vec![ScriptedLookup::found("fixed")]);
        let acquisition = AcquisitionLoop::new(lookup, test_config())
            .run(&unit_square_region(), 1, &mut StdRng::seed_from_u64(5))
            .unwrap();

        assert_eq!(acquisition.records[0].latitude, 0.5);
        assert_eq!(acquisition.records[0].longitude, 0.5);
    }

    #[test]
    fn test_always_not_found_hits_stall_ceiling() {
        let lookup = ScriptedLookup::new(vec![Ok(LookupOutcome::NotFound)]);
        let config = test_config().with_stall_ceiling(120);
        let result = AcquisitionLoop::new(lookup, config).run(
            &unit_square_region(),
            3,
            &mut StdRng::seed_from_u64(6),
        );

        match result {
            Err(AcquireError::QuotaUnreachable {
                region,
                quota,
                accepted,
                candidates_examined,
            }) => {
                assert_eq!(region, "square");
                assert_eq!(quota, 3);
                assert_eq!(accepted, 0);
                assert_eq!(candidates_examined, 120);
            }
            other => panic!("Expected QuotaUnreachable, got {:?}", other.map(|a| a.stats)),
        }
    }

    #[test]
    fn test_only_duplicates_hits_stall_ceiling() {
        let lookup = ScriptedLookup::new(vec![ScriptedLookup::found("same")]);
        let config = test_config().with_stall_ceiling(60);
        let result = AcquisitionLoop::new(lookup, config).run(
            &unit_square_region(),
            2,
            &mut StdRng::seed_from_u64(7),
        );

        match result {
            Err(AcquireError::QuotaUnreachable { accepted, .. }) => assert_eq!(accepted, 1),
            other => panic!("Expected QuotaUnreachable, got {:?}", other.map(|a| a.stats)),
        }
    }

    #[test]
    fn test_denied_aborts_region() {
        let lookup = ScriptedLookup::new(vec![Err(LookupError::Denied(
            "REQUEST_DENIED".to_string(),
        ))]);
        let result = AcquisitionLoop::new(lookup, test_config()).run(
            &unit_square_region(),
            5,
            &mut StdRng::seed_from_u64(8),
        );

        assert!(matches!(result, Err(AcquireError::Lookup(_))));
    }

    #[test]
    fn test_zero_quota_is_invalid() {
        let result = AcquisitionLoop::new(UniqueLookup::new(), test_config()).run(
            &unit_square_region(),
            0,
            &mut StdRng::seed_from_u64(9),
        );
        assert!(matches!(result, Err(AcquireError::InvalidQuota)));
    }

    #[test]
    fn test_dry_sampler_is_quota_unreachable() {
        let lookup = UniqueLookup::new();
        let result = AcquisitionLoop::new(lookup, test_config()).run(
            &sliver_region(),
            5,
            &mut StdRng::seed_from_u64(10),
        );

        match result {
            Err(AcquireError::QuotaUnreachable {
                candidates_examined,
                ..
            }) => {
                // The sampler never produced a candidate to examine.
                assert_eq!(candidates_examined, 0);
            }
            other => panic!("Expected QuotaUnreachable, got {:?}", other.map(|a| a.stats)),
        }
    }

    #[test]
    fn test_acceptance_resets_stall_counter() {
        // not_found runs of 4 between acceptances never reach a ceiling
        // of 6, so all three records are acquired.
        let mut script = Vec::new();
        for i in 0..3 {
            for _ in 0..4 {
                script.push(Ok(LookupOutcome::NotFound));
            }
            script.push(ScriptedLookup::found(&format!("id-{}", i)));
        }
        let lookup = ScriptedLookup::new(script);
        let config = test_config().with_stall_ceiling(6);
        let acquisition = AcquisitionLoop::new(lookup, config)
            .run(&unit_square_region(), 3, &mut StdRng::seed_from_u64(11))
            .unwrap();

        assert_eq!(acquisition.records.len(), 3);
        assert_eq!(acquisition.stats.not_found, 12);
    }
}
