//! Panorama lookup abstraction
//!
//! This module provides traits and implementations for validating candidate
//! coordinates against a street-level panorama metadata service.
//!
//! The service is queried one coordinate at a time with a search radius; it
//! answers either "no panorama near this point" or a canonical location and
//! a unique panorama identifier. The canonical location is authoritative:
//! panoramas are frequently offset from the queried point, and several
//! nearby candidates can resolve to the same identifier.

mod http;
mod metadata;
mod types;

pub use http::{HttpClient, ReqwestClient};
pub use metadata::StreetViewLookup;
pub use types::{LookupError, LookupOutcome, PanoLookup};

#[cfg(test)]
pub use http::tests::MockHttpClient;
