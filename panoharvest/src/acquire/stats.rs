//! Per-region acquisition counters.

/// Counters for one region's acquisition run.
///
/// `transient_errors` is tracked separately from `not_found` even though
/// both advance to the next candidate: a network failure is not evidence
/// that no panorama exists at the point, and conflating the two hides
/// service trouble in the acceptance-rate numbers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AcquireStats {
    /// Candidates accepted as new unique panoramas
    pub accepted: usize,
    /// Candidates the service answered with "no panorama here"
    pub not_found: usize,
    /// Candidates resolving to an already-seen identifier
    pub duplicates: usize,
    /// Candidates lost to transient service errors
    pub transient_errors: usize,
    /// Total candidates submitted to the lookup service
    pub candidates_examined: u64,
    /// Sampler batches drawn, including ones fully rejected
    pub batches_drawn: u64,
}

impl AcquireStats {
    /// Fraction of examined candidates that were accepted, or zero when
    /// nothing was examined.
    pub fn acceptance_rate(&self) -> f64 {
        if self.candidates_examined == 0 {
            0.0
        } else {
            self.accepted as f64 / self.candidates_examined as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acceptance_rate() {
        let stats = AcquireStats {
            accepted: 25,
            candidates_examined: 100,
            ..Default::default()
        };
        assert_eq!(stats.acceptance_rate(), 0.25);
    }

    #[test]
    fn test_acceptance_rate_no_candidates() {
        assert_eq!(AcquireStats::default().acceptance_rate(), 0.0);
    }
}
