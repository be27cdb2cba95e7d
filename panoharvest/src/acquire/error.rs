//! Acquisition loop errors.

use thiserror::Error;

use crate::lookup::LookupError;

/// Errors that can end a region's acquisition run.
#[derive(Debug, Error)]
pub enum AcquireError {
    /// Quota of zero makes the loop a no-op; fail fast instead
    #[error("Quota must be positive")]
    InvalidQuota,

    /// The region stopped producing acceptable candidates.
    ///
    /// Raised when `stall_ceiling` consecutive candidates (or the
    /// equivalent run of fully-rejected sampler batches) pass without a
    /// single acceptance. This converts the unbounded-retry risk of
    /// rejection sampling into a reported failure.
    #[error(
        "Region '{region}' stalled after {candidates_examined} candidates \
         ({accepted}/{quota} panoramas acquired)"
    )]
    QuotaUnreachable {
        region: String,
        quota: usize,
        accepted: usize,
        candidates_examined: u64,
    },

    /// The lookup service refused a request outright (bad key, quota
    /// exhausted); retrying other candidates would fail the same way.
    #[error("Lookup service refused the region: {0}")]
    Lookup(#[from] LookupError),
}
