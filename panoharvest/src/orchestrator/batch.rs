//! Batch orchestration implementation.

use rand::Rng;
use thiserror::Error;
use tracing::{error, info};

use crate::acquire::{AcquireError, AcquireStats, AcquisitionLoop, PanoRecord};
use crate::lookup::PanoLookup;
use crate::region::{RegionError, RegionSource};

/// A region-level failure inside a batch run.
#[derive(Debug, Error)]
pub enum BatchError {
    /// Region could not be resolved from the boundary source
    #[error(transparent)]
    Region(#[from] RegionError),

    /// Acquisition failed for the region
    #[error(transparent)]
    Acquire(#[from] AcquireError),
}

/// Outcome of one region within a batch.
#[derive(Debug)]
pub struct RegionReport {
    /// Region name as requested
    pub region: String,
    /// Acquisition counters on success, the failure otherwise
    pub outcome: Result<AcquireStats, BatchError>,
}

/// Combined result of a batch run.
#[derive(Debug)]
pub struct BatchResult {
    /// All accepted records, region by region in processing order
    pub records: Vec<PanoRecord>,
    /// One report per requested region, in processing order
    pub reports: Vec<RegionReport>,
}

impl BatchResult {
    /// Number of regions that completed their quota.
    pub fn completed_regions(&self) -> usize {
        self.reports.iter().filter(|r| r.outcome.is_ok()).count()
    }

    /// Whether every requested region failed.
    pub fn all_failed(&self) -> bool {
        !self.reports.is_empty() && self.completed_regions() == 0
    }
}

/// Runs the acquisition loop across a list of regions.
pub struct BatchOrchestrator<S, L> {
    source: S,
    acquisition: AcquisitionLoop<L>,
}

impl<S: RegionSource, L: PanoLookup> BatchOrchestrator<S, L> {
    /// Creates an orchestrator over a region source and acquisition loop.
    pub fn new(source: S, acquisition: AcquisitionLoop<L>) -> Self {
        Self {
            source,
            acquisition,
        }
    }

    /// Processes each region in order with the same per-region quota.
    ///
    /// Never fails as a whole: per-region failures are captured in the
    /// returned reports while completed regions keep their records.
    pub fn run<R: Rng>(
        &self,
        region_names: &[String],
        quota: usize,
        rng: &mut R,
    ) -> BatchResult {
        let mut records = Vec::new();
        let mut reports = Vec::with_capacity(region_names.len());

        for name in region_names {
            let outcome = self.run_region(name, quota, rng, &mut records);
            if let Err(e) = &outcome {
                error!(region = name.as_str(), error = %e, "Region failed");
            } else {
                info!(region = name.as_str(), "Region done");
            }
            reports.push(RegionReport {
                region: name.clone(),
                outcome,
            });
        }

        BatchResult { records, reports }
    }

    fn run_region<R: Rng>(
        &self,
        name: &str,
        quota: usize,
        rng: &mut R,
        records: &mut Vec<PanoRecord>,
    ) -> Result<AcquireStats, BatchError> {
        let region = self.source.get_region(name)?;
        let acquisition = self.acquisition.run(&region, quota, rng)?;
        records.extend(acquisition.records);
        Ok(acquisition.stats)
    }
}
