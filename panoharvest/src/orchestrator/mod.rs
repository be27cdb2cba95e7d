//! Multi-region batch orchestration
//!
//! Runs the acquisition loop once per named region, strictly in order,
//! concatenating the accepted records into one combined list. A region
//! that fails (unknown name, unreachable quota, refused service) is
//! reported in its [`RegionReport`] and does not disturb regions already
//! completed or still pending. No cross-region deduplication is performed:
//! the same panorama identifier appearing under two regions is unlikely
//! but not an error.

mod batch;

pub use batch::{BatchError, BatchOrchestrator, BatchResult, RegionReport};
