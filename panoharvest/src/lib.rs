//! Panoharvest - street-level panorama acquisition
//!
//! This library acquires a geographically diverse, deduplicated set of
//! street-level panorama locations for a set of named regions, then
//! downloads four directional images per panorama.
//!
//! The pipeline is built from small, separately-testable pieces:
//!
//! 1. A [`region::RegionSource`] resolves a region name to its boundary
//!    polygon.
//! 2. The [`sampler`] draws candidate coordinates uniformly over the
//!    boundary's bounding box and rejects those outside the polygon.
//! 3. A [`lookup::PanoLookup`] validates each candidate against the
//!    panorama metadata service.
//! 4. The [`acquire::AcquisitionLoop`] runs sampling and validation until
//!    the per-region quota of unique panorama identifiers is met.
//! 5. The [`orchestrator::BatchOrchestrator`] repeats this per region and
//!    concatenates the results.
//! 6. The [`imagery`] module downloads the four directional images for
//!    every accepted record, and [`output`] persists the CSV tables.
//!
//! # Example
//!
//! ```ignore
//! use panoharvest::acquire::{AcquireConfig, AcquisitionLoop};
//! use panoharvest::lookup::{ReqwestClient, StreetViewLookup};
//! use panoharvest::orchestrator::BatchOrchestrator;
//! use panoharvest::region::GeoJsonRegionSource;
//!
//! let source = GeoJsonRegionSource::from_file(boundaries, "name")?;
//! let lookup = StreetViewLookup::new(ReqwestClient::new()?, api_key);
//! let orchestrator =
//!     BatchOrchestrator::new(source, AcquisitionLoop::new(lookup, AcquireConfig::default()));
//! let result = orchestrator.run(&regions, 1000, &mut rand::thread_rng());
//! ```

pub mod acquire;
pub mod config;
pub mod coord;
pub mod imagery;
pub mod logging;
pub mod lookup;
pub mod orchestrator;
pub mod output;
pub mod region;
pub mod sampler;

/// Version of the panoharvest library and CLI.
///
/// This is synchronized across all components in the workspace.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
