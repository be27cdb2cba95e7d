//! Lookup types and traits

use thiserror::Error;

use crate::coord::GeoPoint;

/// Errors that can occur during a panorama lookup.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LookupError {
    /// HTTP request failed (network error, timeout, non-success status)
    #[error("HTTP error: {0}")]
    Http(String),

    /// Response body could not be interpreted
    #[error("Invalid metadata response: {0}")]
    InvalidResponse(String),

    /// The service refused the request (bad key, quota exhausted)
    #[error("Lookup request denied: {0}")]
    Denied(String),
}

impl LookupError {
    /// Whether the error is transient for a single candidate.
    ///
    /// Transient errors are treated like rejected candidates by the
    /// acquisition loop; a denied request aborts the region instead, since
    /// every subsequent candidate would be denied too.
    pub fn is_transient(&self) -> bool {
        !matches!(self, LookupError::Denied(_))
    }
}

/// Result of a successful lookup request.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupOutcome {
    /// A panorama exists within the search radius.
    Found {
        /// Canonical latitude of the panorama (not the queried point)
        lat: f64,
        /// Canonical longitude of the panorama
        lon: f64,
        /// Unique panorama identifier
        pano_id: String,
    },
    /// No panorama within the search radius.
    NotFound,
}

/// Trait for panorama metadata services.
///
/// Implementations are blocking: the acquisition loop issues one lookup at
/// a time and waits for the answer before the next candidate.
pub trait PanoLookup {
    /// Queries for a panorama within `radius_m` meters of `point`.
    fn lookup(&self, point: &GeoPoint, radius_m: u32) -> Result<LookupOutcome, LookupError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error_is_transient() {
        assert!(LookupError::Http("timeout".to_string()).is_transient());
    }

    #[test]
    fn test_invalid_response_is_transient() {
        assert!(LookupError::InvalidResponse("truncated".to_string()).is_transient());
    }

    #[test]
    fn test_denied_is_not_transient() {
        assert!(!LookupError::Denied("REQUEST_DENIED".to_string()).is_transient());
    }
}
