//! Accepted panorama record.

use serde::{Deserialize, Serialize};

/// A confirmed, uniquely-identified street-level panorama location.
///
/// Coordinates are the canonical location reported by the lookup service,
/// never the sampled candidate point. Records are immutable once created:
/// the loop appends them to a region's result list and nothing mutates or
/// deletes them afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanoRecord {
    /// Region the record was acquired for
    pub region: String,
    /// Canonical latitude in decimal degrees
    pub latitude: f64,
    /// Canonical longitude in decimal degrees
    pub longitude: f64,
    /// Unique panorama identifier
    pub pano_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_field_order() {
        let record = PanoRecord {
            region: "Spain".to_string(),
            latitude: 40.4168,
            longitude: -3.7038,
            pano_id: "abc123".to_string(),
        };

        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(
            json,
            r#"{"region":"Spain","latitude":40.4168,"longitude":-3.7038,"pano_id":"abc123"}"#
        );
    }
}
