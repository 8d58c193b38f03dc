use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::measurement::{Distance, Measurement, Speed, Temperature};

use super::Coordinates;

/// A point on a route, sent to the road risk endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrackPoint {
    pub coordinates: Coordinates,
    pub forecast_time: DateTime<Utc>,
}

impl TrackPoint {
    pub fn new(coordinates: Coordinates, forecast_time: DateTime<Utc>) -> Self {
        Self {
            coordinates,
            forecast_time,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoadRiskRecord {
    pub forecast_time: DateTime<Utc>,
    pub coordinates: Option<Coordinates>,
    pub weather: Option<RoadWeather>,
    pub road: Option<RoadDetails>,
    /// Empty when the provider reports no alerts.
    pub alerts: Vec<RoadAlert>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RoadWeather {
    pub temperature: Measurement<Temperature>,
    pub wind_speed: Measurement<Speed>,
    pub wind_degrees: Option<f64>,
    pub dew_point: Option<Measurement<Temperature>>,
    /// mm/h.
    pub precipitation_intensity: Option<f64>,
    pub visibility: Option<Measurement<Distance>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RoadDetails {
    pub state: Option<RoadState>,
    pub surface_temperature: Option<Measurement<Temperature>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RoadState {
    NoReport,
    Dry,
    Moist,
    MoistAndChemicallyTreated,
    Wet,
    WetAndChemicallyTreated,
    Ice,
    FrostySnow,
    SnowPacked,
}

impl RoadState {
    pub fn from_value(value: i64) -> Option<Self> {
        match value {
            0 => Some(Self::NoReport),
            1 => Some(Self::Dry),
            2 => Some(Self::Moist),
            3 => Some(Self::MoistAndChemicallyTreated),
            4 => Some(Self::Wet),
            5 => Some(Self::WetAndChemicallyTreated),
            6 => Some(Self::Ice),
            7 => Some(Self::FrostySnow),
            8 => Some(Self::SnowPacked),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoadAlert {
    pub sender_name: Option<String>,
    pub event: String,
    pub level: Option<EventLevel>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EventLevel {
    Unknown,
    Green,
    Yellow,
    Orange,
    Red,
}

impl EventLevel {
    pub fn from_value(value: i64) -> Option<Self> {
        match value {
            0 => Some(Self::Unknown),
            1 => Some(Self::Green),
            2 => Some(Self::Yellow),
            3 => Some(Self::Orange),
            4 => Some(Self::Red),
            _ => None,
        }
    }
}
