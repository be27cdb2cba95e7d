//! Acquisition loop configuration.

use std::time::Duration;

use crate::sampler::DEFAULT_BATCH_SIZE;

/// Default lookup search radius in meters.
pub const DEFAULT_RADIUS_M: u32 = 1000;

/// Default stall ceiling: consecutive candidates without an acceptance
/// before the loop gives up on a region.
pub const DEFAULT_STALL_CEILING: usize = 20_000;

/// Default base delay for exponential backoff after transient errors.
pub const DEFAULT_RETRY_BASE_DELAY_MS: u64 = 500;

/// Cap on a single backoff sleep.
pub const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// Tunable parameters for the acquisition loop.
///
/// # Example
///
/// ```
/// use panoharvest::acquire::AcquireConfig;
///
/// let config = AcquireConfig::default()
///     .with_batch_size(1000)
///     .with_radius_m(500);
/// ```
#[derive(Debug, Clone)]
pub struct AcquireConfig {
    /// Bounding-box samples per batch; independent of the remaining quota
    pub batch_size: usize,
    /// Lookup search radius in meters
    pub radius_m: u32,
    /// Consecutive candidates without acceptance before giving up
    pub stall_ceiling: usize,
    /// Minimum spacing between lookup requests (rate cap); zero disables
    pub min_request_interval: Duration,
    /// Base delay for exponential backoff on consecutive transient errors;
    /// zero disables backoff
    pub retry_base_delay: Duration,
}

impl Default for AcquireConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            radius_m: DEFAULT_RADIUS_M,
            stall_ceiling: DEFAULT_STALL_CEILING,
            min_request_interval: Duration::ZERO,
            retry_base_delay: Duration::from_millis(DEFAULT_RETRY_BASE_DELAY_MS),
        }
    }
}

impl AcquireConfig {
    /// Sets the per-batch sample count.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Sets the lookup search radius in meters.
    pub fn with_radius_m(mut self, radius_m: u32) -> Self {
        self.radius_m = radius_m;
        self
    }

    /// Sets the stall ceiling.
    pub fn with_stall_ceiling(mut self, stall_ceiling: usize) -> Self {
        self.stall_ceiling = stall_ceiling;
        self
    }

    /// Sets the minimum spacing between lookup requests.
    pub fn with_min_request_interval(mut self, interval: Duration) -> Self {
        self.min_request_interval = interval;
        self
    }

    /// Sets the backoff base delay for transient errors.
    pub fn with_retry_base_delay(mut self, delay: Duration) -> Self {
        self.retry_base_delay = delay;
        self
    }

    /// Empty-batch allowance for the candidate stream, derived from the
    /// stall ceiling so an all-rejecting bounding box is cut off after the
    /// same amount of work as an all-rejecting lookup service.
    pub fn max_empty_batches(&self) -> u32 {
        let batches = self.stall_ceiling.div_ceil(self.batch_size.max(1));
        batches.max(1) as u32
    }
}
