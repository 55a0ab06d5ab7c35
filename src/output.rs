//! Serializable view of a snapshot, one JSON object per line.

use serde::Serialize;

use qibla_core::session::Snapshot;

/// Flat snapshot record for JSON output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnapshotRecord {
    pub phase: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_bearing_deg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading_deg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading_frame: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relative_bearing_deg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset_deg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aligned: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sequence: Option<u64>,
}

impl From<&Snapshot> for SnapshotRecord {
    fn from(snapshot: &Snapshot) -> Self {
        Self {
            phase: snapshot.phase.as_str(),
            // Two decimals, as shown to the user
            location: snapshot
                .location
                .map(|p| format!("{:.2}, {:.2}", p.latitude, p.longitude)),
            latitude: snapshot.location.map(|p| p.latitude),
            longitude: snapshot.location.map(|p| p.longitude),
            target_bearing_deg: snapshot.target_bearing.map(|b| b.degrees()),
            distance_km: snapshot.distance_m.map(|m| m / 1000.0),
            heading_deg: snapshot.heading.map(|h| h.degrees()),
            heading_frame: snapshot.heading.map(|h| h.frame.as_str()),
            relative_bearing_deg: snapshot.relative_bearing().map(|b| b.degrees()),
            offset_deg: snapshot.alignment.map(|a| a.offset_deg),
            aligned: snapshot.alignment.map(|a| a.is_aligned()),
            notice: snapshot.notice.map(|n| n.as_str()),
            failure: snapshot.failure.map(|f| f.to_string()),
            sequence: snapshot.sequence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qibla_core::geo::GeoPoint;
    use qibla_core::session::{DirectionSession, LocationError, SessionConfig};

    #[test]
    fn test_idle_record_only_has_phase() {
        let record = SnapshotRecord::from(&Snapshot::default());
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"phase":"Idle"}"#);
    }

    #[test]
    fn test_ready_record_shows_location_and_bearing() {
        let mut session = DirectionSession::new(SessionConfig::default());
        session.start().unwrap();
        let snapshot = session
            .on_location_fix(Ok(GeoPoint {
                latitude: 40.7128,
                longitude: -74.0060,
            }))
            .unwrap()
            .unwrap();

        let record = SnapshotRecord::from(&snapshot);
        assert_eq!(record.phase, "Ready");
        assert_eq!(record.location.as_deref(), Some("40.71, -74.01"));
        assert!((record.target_bearing_deg.unwrap() - 58.48).abs() < 0.01);
        assert!(record.heading_deg.is_none());
        assert!(record.aligned.is_none());

        let value: serde_json::Value = serde_json::to_value(&record).unwrap();
        assert!(value.get("heading_deg").is_none());
        assert_eq!(value["phase"], "Ready");
    }

    #[test]
    fn test_failure_record() {
        let mut session = DirectionSession::new(SessionConfig::default());
        session.start().unwrap();
        let snapshot = session
            .on_location_fix(Err(LocationError::PermissionDenied))
            .unwrap()
            .unwrap();
        let record = SnapshotRecord::from(&snapshot);
        assert_eq!(record.phase, "LocationUnavailable");
        assert_eq!(record.failure.as_deref(), Some("location permission denied"));
    }
}
