//! Road risk along a route.

use serde::Serialize;

use crate::error::OwmError;
use crate::mapper;
use crate::model::UnitSystem;
use crate::model::road_risk::{RoadRiskRecord, TrackPoint};

use super::{Customizer, Endpoint, Requester};

/// `data/2.5/roadrisk`, POSTed with the route as JSON.
#[derive(Debug)]
pub struct RoadRisk;

impl Endpoint for RoadRisk {
    type Output = Vec<RoadRiskRecord>;

    fn map(body: &str, _units: UnitSystem) -> Result<Vec<RoadRiskRecord>, OwmError> {
        mapper::road_risk::road_risk(body)
    }
}

impl Requester<RoadRisk> {
    pub fn by_track_points(self, points: Vec<TrackPoint>) -> Result<Customizer<RoadRisk>, OwmError> {
        if points.is_empty() {
            return Err(OwmError::invalid_parameter("track must contain at least one point"));
        }
        Ok(self.locate(|s| s.set_payload(Track(points), serialize_track)))
    }
}

struct Track(Vec<TrackPoint>);

#[derive(Serialize)]
struct TrackBody {
    track: Vec<TrackPointBody>,
}

#[derive(Serialize)]
struct TrackPointBody {
    lat: f64,
    lon: f64,
    dt: i64,
}

/// `{"track": [{"lat": .., "lon": .., "dt": ..}, ..]}`.
fn serialize_track(track: &Track) -> Result<String, OwmError> {
    let body = TrackBody {
        track: track
            .0
            .iter()
            .map(|p| TrackPointBody {
                lat: p.coordinates.latitude(),
                lon: p.coordinates.longitude(),
                dt: p.forecast_time.timestamp(),
            })
            .collect(),
    };

    serde_json::to_string(&body)
        .map_err(|e| OwmError::invalid_parameter(format!("could not encode track: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Coordinates;
    use chrono::DateTime;

    #[test]
    fn track_is_encoded_as_documented() {
        let point = TrackPoint::new(
            Coordinates::new(7.27, 44.04).unwrap(),
            DateTime::from_timestamp(1602702000, 0).unwrap(),
        );

        let json = serialize_track(&Track(vec![point])).unwrap();

        assert_eq!(json, r#"{"track":[{"lat":7.27,"lon":44.04,"dt":1602702000}]}"#);
    }
}
