//! Street View metadata lookup.
//!
//! Queries the Street View Static API metadata endpoint, which is free of
//! charge and answers whether a panorama exists near a coordinate without
//! fetching any imagery.
//!
//! # API Endpoint
//!
//! - `https://maps.googleapis.com/maps/api/streetview/metadata?location={LAT},{LON}&radius={R}&key={API_KEY}`
//!
//! # Response Semantics
//!
//! The JSON `status` field drives the outcome:
//! - `"OK"` - a panorama exists; `pano_id` and `location` carry the
//!   canonical identifier and coordinates.
//! - `"ZERO_RESULTS"` - no panorama within the search radius.
//! - anything else (`REQUEST_DENIED`, `OVER_QUERY_LIMIT`, ...) - the
//!   request itself was refused; retrying other candidates will not help.

use serde::Deserialize;

use super::http::HttpClient;
use super::types::{LookupError, LookupOutcome, PanoLookup};
use crate::coord::GeoPoint;

/// Street View metadata endpoint.
const METADATA_ENDPOINT: &str = "https://maps.googleapis.com/maps/api/streetview/metadata";

/// Panorama lookup backed by the Street View metadata endpoint.
///
/// Requires a Maps Platform API key with the Street View Static API
/// enabled. Metadata requests are not billed, but they are subject to the
/// key's request-rate limits; the acquisition loop paces them.
pub struct StreetViewLookup<C: HttpClient> {
    http_client: C,
    api_key: String,
}

/// Wire format of a metadata response. Fields other than `status` are only
/// present when `status == "OK"`.
#[derive(Debug, Deserialize)]
struct MetadataResponse {
    status: String,
    pano_id: Option<String>,
    location: Option<MetadataLocation>,
}

#[derive(Debug, Deserialize)]
struct MetadataLocation {
    lat: f64,
    lng: f64,
}

impl<C: HttpClient> StreetViewLookup<C> {
    /// Creates a lookup with the given API key.
    pub fn new(http_client: C, api_key: String) -> Self {
        Self {
            http_client,
            api_key,
        }
    }

    /// Builds the metadata URL for a candidate point.
    fn build_url(&self, point: &GeoPoint, radius_m: u32) -> String {
        format!(
            "{}?location={}&radius={}&key={}",
            METADATA_ENDPOINT, point, radius_m, self.api_key
        )
    }

    fn parse_response(body: &[u8]) -> Result<LookupOutcome, LookupError> {
        let response: MetadataResponse = serde_json::from_slice(body)
            .map_err(|e| LookupError::InvalidResponse(format!("JSON parse failed: {}", e)))?;

        match response.status.as_str() {
            "OK" => {
                let pano_id = response.pano_id.ok_or_else(|| {
                    LookupError::InvalidResponse("OK response without pano_id".to_string())
                })?;
                let location = response.location.ok_or_else(|| {
                    LookupError::InvalidResponse("OK response without location".to_string())
                })?;
                Ok(LookupOutcome::Found {
                    lat: location.lat,
                    lon: location.lng,
                    pano_id,
                })
            }
            "ZERO_RESULTS" => Ok(LookupOutcome::NotFound),
            other => Err(LookupError::Denied(other.to_string())),
        }
    }
}

impl<C: HttpClient> PanoLookup for StreetViewLookup<C> {
    fn lookup(&self, point: &GeoPoint, radius_m: u32) -> Result<LookupOutcome, LookupError> {
        let url = self.build_url(point, radius_m);
        let body = self.http_client.get(&url)?;
        Self::parse_response(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::MockHttpClient;

    fn found_response() -> Vec<u8> {
        br#"{
            "status": "OK",
            "pano_id": "CAoSLEFGMVFpcE1q",
            "location": { "lat": 48.85837, "lng": 2.294481 },
            "copyright": "(C) Google"
        }"#
        .to_vec()
    }

    fn point() -> GeoPoint {
        GeoPoint::new(48.8584, 2.2945).unwrap()
    }

    #[test]
    fn test_url_construction() {
        let lookup =
            StreetViewLookup::new(MockHttpClient::with_response(Ok(vec![])), "k123".to_string());

        let url = lookup.build_url(&point(), 1000);
        assert_eq!(
            url,
            "https://maps.googleapis.com/maps/api/streetview/metadata\
             ?location=48.8584,2.2945&radius=1000&key=k123"
        );
    }

    #[test]
    fn test_found_uses_canonical_location() {
        let mock = MockHttpClient::with_response(Ok(found_response()));
        let lookup = StreetViewLookup::new(mock, "key".to_string());

        let outcome = lookup.lookup(&point(), 1000).unwrap();
        match outcome {
            LookupOutcome::Found { lat, lon, pano_id } => {
                // Canonical coordinates from the response, not the query.
                assert_eq!(lat, 48.85837);
                assert_eq!(lon, 2.294481);
                assert_eq!(pano_id, "CAoSLEFGMVFpcE1q");
            }
            other => panic!("Expected Found, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_results_is_not_found() {
        let mock =
            MockHttpClient::with_response(Ok(br#"{"status": "ZERO_RESULTS"}"#.to_vec()));
        let lookup = StreetViewLookup::new(mock, "key".to_string());

        let outcome = lookup.lookup(&point(), 1000).unwrap();
        assert_eq!(outcome, LookupOutcome::NotFound);
    }

    #[test]
    fn test_request_denied_is_denied_error() {
        let mock =
            MockHttpClient::with_response(Ok(br#"{"status": "REQUEST_DENIED"}"#.to_vec()));
        let lookup = StreetViewLookup::new(mock, "bad-key".to_string());

        let result = lookup.lookup(&point(), 1000);
        match result {
            Err(LookupError::Denied(status)) => assert_eq!(status, "REQUEST_DENIED"),
            other => panic!("Expected Denied, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_body_is_invalid_response() {
        let mock = MockHttpClient::with_response(Ok(b"<html>rate limited</html>".to_vec()));
        let lookup = StreetViewLookup::new(mock, "key".to_string());

        let result = lookup.lookup(&point(), 1000);
        assert!(matches!(result, Err(LookupError::InvalidResponse(_))));
    }

    #[test]
    fn test_ok_without_pano_id_is_invalid_response() {
        let mock = MockHttpClient::with_response(Ok(
            br#"{"status": "OK", "location": {"lat": 1.0, "lng": 2.0}}"#.to_vec(),
        ));
        let lookup = StreetViewLookup::new(mock, "key".to_string());

        let result = lookup.lookup(&point(), 1000);
        assert!(matches!(result, Err(LookupError::InvalidResponse(_))));
    }

    #[test]
    fn test_http_error_propagates() {
        let mock =
            MockHttpClient::with_response(Err(LookupError::Http("connection reset".to_string())));
        let lookup = StreetViewLookup::new(mock, "key".to_string());

        let result = lookup.lookup(&point(), 1000);
        assert!(matches!(result, Err(LookupError::Http(_))));
    }
}
