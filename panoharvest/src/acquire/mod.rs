//! Panorama acquisition loop
//!
//! The core of the system: repeatedly pulls candidate points from the
//! sampler, validates each against the panorama lookup service, and
//! deduplicates by identifier until the per-region quota of unique
//! panoramas is met.
//!
//! The loop is a small state machine per candidate:
//!
//! ```text
//! SAMPLING -> VALIDATING -> (ACCEPTED | REJECTED | DUPLICATE) -> SAMPLING ...
//! ```
//!
//! with a terminal `QUOTA_MET` state the instant the result list reaches
//! the quota (mid-batch included) and a guarded failure path: a run of
//! candidates with no acceptance beyond the configured stall ceiling ends
//! in [`AcquireError::QuotaUnreachable`] instead of looping forever.

mod config;
mod core;
mod error;
mod record;
mod stats;

pub use self::core::{Acquisition, AcquisitionLoop};
pub use config::{
    AcquireConfig, DEFAULT_RADIUS_M, DEFAULT_RETRY_BASE_DELAY_MS, DEFAULT_STALL_CEILING,
};
pub use error::AcquireError;
pub use record::PanoRecord;
pub use stats::AcquireStats;
